// Cluster layout on a circle.
//
// Leaves share the full angular span in tree order, each getting a slice
// proportional to its size; a leaf sits at the middle of its slice.
// Inner nodes sit at the mean angle of their children. Radius grows with
// depth: root at the center, categories halfway, leaves on the inner ring.
//
// Optional `group_gap` inserts empty space between categories (and half of
// it on each side of the 0/360 seam), measured in leaf-weight units.

use serde::Serialize;
use tracing::instrument;

use crate::data::{Hierarchy, NodeId};
use super::PolarPoint;

pub const FULL_CIRCLE: f64 = 360.0;

/// Angular interval in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct Slice {
    pub start: f64,
    pub end: f64,
}

impl Slice {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterLayout {
    /// Indexed by `NodeId`.
    pub positions: Vec<PolarPoint>,
    /// Leaf slices and category extents, indexed by `NodeId`; `None` for the root.
    pub slices: Vec<Option<Slice>>,
    pub inner_radius: f64,
}

impl ClusterLayout {
    pub fn position(&self, nid: NodeId) -> PolarPoint {
        self.positions[nid.0]
    }

    pub fn slice(&self, nid: NodeId) -> Option<Slice> {
        self.slices[nid.0]
    }
}

#[instrument(level = "debug", skip(hierarchy))]
pub fn cluster_layout(hierarchy: &Hierarchy, span: f64, inner_radius: f64, group_gap: f64) -> ClusterLayout {
    let mut positions = vec![PolarPoint::default(); hierarchy.nodes.len()];
    let mut slices: Vec<Option<Slice>> = vec![None; hierarchy.nodes.len()];

    let categories = hierarchy.categories();
    if categories.is_empty() {
        return ClusterLayout { positions, slices, inner_radius };
    }

    let gap = if categories.len() > 1 { group_gap.max(0.0) } else { 0.0 };

    // First pass in weight units: leaf slices and the boundaries between
    // category extents. Boundaries are shared so extents tile exactly.
    let mut cursor = gap / 2.0;
    let mut boundaries = vec![0.0];
    for (k, &gid) in categories.iter().enumerate() {
        if k > 0 {
            boundaries.push(cursor + gap / 2.0);
            cursor += gap;
        }
        for &leaf in &hierarchy.node(gid).children {
            let size = hierarchy.node(leaf).size;
            slices[leaf.0] = Some(Slice { start: cursor, end: cursor + size });
            cursor += size;
        }
    }
    let total = cursor + gap / 2.0;
    boundaries.push(total);

    let scale = if total > 0.0 { span / total } else { 0.0 };
    let category_radius = inner_radius / 2.0;

    for leaf in hierarchy.leaves() {
        if let Some(s) = slices[leaf.0].as_mut() {
            s.start *= scale;
            s.end *= scale;
            positions[leaf.0] = PolarPoint { angle: s.mid(), radius: inner_radius };
        }
    }

    let mut root_angle = 0.0;
    for (k, &gid) in categories.iter().enumerate() {
        let children = &hierarchy.node(gid).children;
        let angle = if children.is_empty() {
            boundaries[k] * scale
        } else {
            children.iter().map(|c| positions[c.0].angle).sum::<f64>() / children.len() as f64
        };
        positions[gid.0] = PolarPoint { angle, radius: category_radius };
        slices[gid.0] = Some(Slice {
            start: boundaries[k] * scale,
            end: boundaries[k + 1] * scale,
        });
        root_angle += angle;
    }
    positions[hierarchy.root.0] = PolarPoint {
        angle: root_angle / categories.len() as f64,
        radius: 0.0,
    };

    ClusterLayout { positions, slices, inner_radius }
}
