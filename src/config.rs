//! Chart configuration.
//!
//! Field names follow the JS config object the front-end passes in
//! (`innerRadiusDiff`, `arcWidth`, `colorSet`, ...). Every field is optional
//! on the wire and falls back to [`ChartConfig::default`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// d3 `category20` palette.
pub const CATEGORY20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896", "#9467bd",
    "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7", "#bcbd22", "#dbdb8d",
    "#17becf", "#9edae5",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    /// Band between the leaf ring and the outer edge (arcs + labels).
    pub inner_radius_diff: f64,
    pub arc_width: f64,
    /// Gap between the leaf ring and the arc band.
    pub arc_offset: f64,
    pub arc_labels_padding: f64,
    /// Radial gap between a leaf and its label.
    pub label_offset: f64,
    /// Initial bundle tension.
    pub tension: f64,
    pub color_set: Vec<String>,
    /// Inset applied to the first arc's start and the last arc's end.
    pub seam_inset_degrees: f64,
    /// Widening applied to arc edges on either side of the vertical axis.
    pub half_offset_degrees: f64,
    /// Extra angular space between categories, in leaf-weight units.
    pub group_gap: f64,
    /// Distance from the right end of the tension track to the canvas edge.
    pub slider_margin: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            inner_radius_diff: 120.0,
            arc_width: 30.0,
            arc_offset: 5.0,
            arc_labels_padding: 5.0,
            label_offset: 8.0,
            tension: 0.85,
            color_set: CATEGORY20.iter().map(|c| c.to_string()).collect(),
            seam_inset_degrees: 0.5,
            half_offset_degrees: 2.0,
            group_gap: 0.0,
            slider_margin: 20.0,
        }
    }
}

impl ChartConfig {
    /// Parse a JSON config object; an empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: ChartConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("innerRadiusDiff", self.inner_radius_diff),
            ("arcWidth", self.arc_width),
            ("arcOffset", self.arc_offset),
            ("arcLabelsPadding", self.arc_labels_padding),
            ("labelOffset", self.label_offset),
            ("seamInsetDegrees", self.seam_inset_degrees),
            ("halfOffsetDegrees", self.half_offset_degrees),
            ("groupGap", self.group_gap),
            ("sliderMargin", self.slider_margin),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config {
                    message: format!("{name} must be a finite, non-negative number (got {value})"),
                });
            }
        }
        if !self.tension.is_finite() {
            return Err(Error::Config { message: "tension must be finite".to_string() });
        }
        Ok(())
    }

    /// Palette color for a group index, cycling when the palette is short.
    pub fn color(&self, index: usize) -> Option<&str> {
        if self.color_set.is_empty() {
            None
        } else {
            Some(self.color_set[index % self.color_set.len()].as_str())
        }
    }
}
