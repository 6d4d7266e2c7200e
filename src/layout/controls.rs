// Tension slider geometry.
//
// The track runs horizontally near the top of the canvas from half the
// outer radius to just short of the right edge. A drag moves the handle by
// a pixel delta; the new handle position maps linearly back to a tension.

use serde::Serialize;

use crate::config::ChartConfig;
use super::{Tension, Viewport};

const TRACK_TOP: f64 = 25.0;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TensionSlider {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
}

impl TensionSlider {
    pub fn new(viewport: &Viewport, cfg: &ChartConfig) -> Self {
        let r = viewport.outer_radius();
        Self {
            x1: r / 2.0,
            x2: r - cfg.slider_margin,
            y: -r + TRACK_TOP,
        }
    }

    fn track(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Handle position for a tension.
    pub fn handle_x(&self, tension: Tension) -> f64 {
        self.x1 + tension.value() * self.track().max(0.0)
    }

    /// Tension after dragging the handle by `dx` pixels. A collapsed track
    /// or a non-finite delta leaves the tension as it was.
    pub fn drag(&self, tension: Tension, dx: f64) -> Tension {
        let track = self.track();
        if track <= 0.0 || !dx.is_finite() {
            return tension;
        }
        let x = (self.handle_x(tension) + dx).clamp(self.x1, self.x2);
        Tension::new((x - self.x1) / track).unwrap_or(tension)
    }
}
