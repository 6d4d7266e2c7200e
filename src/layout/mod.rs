// Radial layout for the edge-bundling chart.
//
// Goals:
// - Pure: (hierarchy, viewport, config) -> geometry, nothing cached
// - Deterministic: same inputs give bit-identical angles and paths
// - Degenerate-safe: empty trees, single leaves, zero-size viewports
//
// Submodules:
// - cluster: leaf slices and per-node polar coordinates
// - arcs: one corrected angular span per category
// - bundle: LCA control polygons, tension, B-spline interpolation
// - labels: leaf label orientation
// - controls: tension slider track geometry
//
// Conventions:
// - angles in degrees on nodes (0 at 12 o'clock, clockwise), radians on arcs
// - all coordinates relative to the chart center

use serde::{Deserialize, Serialize};

use crate::config::ChartConfig;

pub mod cluster;
pub mod arcs;
pub mod bundle;
pub mod labels;
pub mod controls;

pub use cluster::{cluster_layout, ClusterLayout, Slice, FULL_CIRCLE};
pub use arcs::{aggregate_arcs, Arc, ArcBand};
pub use bundle::{bundle_links, bundle_path, BundledLink, Curve, Segment, Tension};
pub use labels::{LabelPlacement, TextAnchor};
pub use controls::TensionSlider;

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
        }
    }
}

/// Polar coordinates around the chart center.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct PolarPoint {
    /// Degrees, clockwise from 12 o'clock.
    pub angle: f64,
    pub radius: f64,
}

impl PolarPoint {
    pub fn to_point(self) -> Point {
        let a = self.angle.to_radians();
        Point {
            x: self.radius * a.sin(),
            y: -self.radius * a.cos(),
        }
    }
}

/// Size of the drawing surface handed over by the host page.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        let sane = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self { width: sane(width), height: sane(height) }
    }

    /// A zero height means "square", as when the container has no fixed height.
    pub fn diameter(&self) -> f64 {
        let height = if self.height > 0.0 { self.height } else { self.width };
        self.width.min(height)
    }

    pub fn outer_radius(&self) -> f64 {
        self.diameter() / 2.0
    }

    pub fn inner_radius(&self, cfg: &ChartConfig) -> f64 {
        (self.outer_radius() - cfg.inner_radius_diff).max(0.0)
    }

    pub fn center(&self) -> Point {
        let r = self.outer_radius();
        Point { x: r, y: r }
    }
}
