use serde::Serialize;

use crate::config::ChartConfig;
use super::PolarPoint;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    Start,
    End,
}

/// How a leaf label sits next to its node: rotate by `rotate` degrees,
/// push out by `offset`, then flip on the left half so text stays upright.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub rotate: f64,
    pub offset: f64,
    pub flipped: bool,
    pub anchor: TextAnchor,
    /// Extra shift along the text baseline, clearing the arc band.
    pub dx: f64,
}

impl LabelPlacement {
    pub fn for_leaf(pos: PolarPoint, cfg: &ChartConfig) -> Self {
        let flipped = pos.angle >= 180.0;
        Self {
            rotate: pos.angle - 90.0,
            offset: pos.radius + cfg.label_offset,
            flipped,
            anchor: if flipped { TextAnchor::End } else { TextAnchor::Start },
            dx: if flipped { -cfg.arc_width } else { cfg.arc_width },
        }
    }

    /// SVG `transform` attribute for the label.
    pub fn transform(&self) -> String {
        let mut t = format!("rotate({}) translate({},0)", self.rotate, self.offset);
        if self.flipped {
            t.push_str(" rotate(180)");
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_half_reads_outward() {
        let cfg = ChartConfig::default();
        let p = LabelPlacement::for_leaf(PolarPoint { angle: 30.0, radius: 200.0 }, &cfg);
        assert_eq!(p.rotate, -60.0);
        assert_eq!(p.offset, 208.0);
        assert_eq!(p.anchor, TextAnchor::Start);
        assert_eq!(p.dx, 30.0);
        assert_eq!(p.transform(), "rotate(-60) translate(208,0)");
    }

    #[test]
    fn test_left_half_is_flipped() {
        let cfg = ChartConfig::default();
        let p = LabelPlacement::for_leaf(PolarPoint { angle: 180.0, radius: 200.0 }, &cfg);
        assert!(p.flipped);
        assert_eq!(p.anchor, TextAnchor::End);
        assert_eq!(p.dx, -30.0);
        assert_eq!(p.transform(), "rotate(90) translate(208,0) rotate(180)");
    }
}
