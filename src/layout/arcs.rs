// Category arcs around the rim.
//
// Each category gets the angular range spanned by its leaves, then a small
// cosmetic correction:
// 1. the first arc's start moves in by `seam_inset` so it does not touch
//    the 0/360 seam
// 2. the last arc's end moves in by the same amount
// 3. starts in the right half move back and ends in the left half move
//    forward by `half_offset`, which keeps arc labels clear of the
//    vertical axis
// 4. the result is clamped into the category's extent, so neighbouring
//    arcs can never overlap; at the seam the extent is narrowed by
//    `seam_inset` so the widening in step 3 cannot undo steps 1 and 2
// 5. an inverted span collapses to its midpoint
//
// Angles here are radians, matching what arc path generators expect.

use std::f64::consts::PI;

use serde::Serialize;

use crate::config::ChartConfig;
use crate::data::{Hierarchy, NodeId};
use super::ClusterLayout;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arc {
    pub category: NodeId,
    pub key: String,
    pub start_angle: f64,
    pub end_angle: f64,
    /// The category's share of the circle; arcs stay inside it.
    pub extent_start: f64,
    pub extent_end: f64,
    pub color_index: usize,
    pub color: Option<String>,
}

impl Arc {
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Length of the arc measured along a circle of `radius`.
    pub fn length_at(&self, radius: f64) -> f64 {
        self.span() * radius
    }

    /// Whether a label of the measured `label_width` fits along the arc.
    pub fn label_fits(&self, label_width: f64, radius: f64, padding: f64) -> bool {
        self.length_at(radius) > label_width + padding * 2.0
    }
}

/// Radial band the arcs are drawn in.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ArcBand {
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl ArcBand {
    pub fn new(inner_radius: f64, cfg: &ChartConfig) -> Self {
        let inner = inner_radius + cfg.arc_offset;
        Self {
            inner_radius: inner,
            outer_radius: inner + cfg.arc_width,
        }
    }
}

pub fn aggregate_arcs(hierarchy: &Hierarchy, layout: &ClusterLayout, cfg: &ChartConfig) -> Vec<Arc> {
    let categories = hierarchy.categories();
    let inset = cfg.seam_inset_degrees.to_radians();
    let half_offset = cfg.half_offset_degrees.to_radians();
    let last = categories.len().saturating_sub(1);

    categories
        .iter()
        .enumerate()
        .map(|(i, &gid)| {
            let group = hierarchy.node(gid);
            let extent = layout.slice(gid).unwrap_or_default();
            let (extent_start, extent_end) = (extent.start.to_radians(), extent.end.to_radians());

            let (mut start, mut end) = group
                .children
                .iter()
                .map(|&c| layout.position(c).angle.to_radians())
                .fold(None, |acc: Option<(f64, f64)>, a| match acc {
                    None => Some((a, a)),
                    Some((lo, hi)) => Some((lo.min(a), hi.max(a))),
                })
                .unwrap_or((extent_start, extent_start));

            if i == 0 {
                start += inset;
            }
            if i == last {
                end -= inset;
            }
            if start < PI {
                start -= half_offset;
            }
            if end > PI {
                end += half_offset;
            }

            let lo = if i == 0 { extent_start + inset } else { extent_start };
            let hi = if i == last { extent_end - inset } else { extent_end };
            start = start.max(lo).min(hi);
            end = end.max(lo).min(hi);
            if start > end {
                let mid = (start + end) / 2.0;
                start = mid;
                end = mid;
            }

            Arc {
                category: gid,
                key: group.key.clone(),
                start_angle: start,
                end_angle: end,
                extent_start,
                extent_end,
                color_index: i,
                color: cfg.color(i).map(str::to_string),
            }
        })
        .collect()
}
