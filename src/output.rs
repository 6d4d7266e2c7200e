//! Output types for the front-end.
//!
//! These structs are serialized to JSON and handed to the page, which owns
//! all drawing. Links are listed in paint order.

use serde::Serialize;

use crate::chart::{Dataset, Scene};
use crate::config::ChartConfig;
use crate::data::{NodeId, NodeKind};
use crate::error::Error;
use crate::layout::{LabelPlacement, Point, TensionSlider, TextAnchor};

/// A positioned tree node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeOutput {
    /// Stable handle for focus events and link endpoints
    pub node: NodeId,
    /// Record identifier (leaves only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub key: String,
    pub depth: usize,
    /// Degrees, clockwise from 12 o'clock
    pub angle: f64,
    pub radius: f64,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelOutput>,
    /// Source of a link into the focused leaf
    pub upstream: bool,
    /// Target of a link out of the focused leaf
    pub downstream: bool,
    pub focused: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelOutput {
    pub transform: String,
    pub anchor: String,
    pub dx: f64,
}

/// A bundled link.
#[derive(Debug, Clone, Serialize)]
pub struct LinkOutput {
    /// Node handles of the endpoints
    pub source: NodeId,
    pub target: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// SVG path data
    pub path: String,
    /// Straightened control points
    pub points: Vec<Point>,
    pub incoming: bool,
    pub outgoing: bool,
}

/// A category arc.
#[derive(Debug, Clone, Serialize)]
pub struct ArcOutput {
    pub key: String,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Arc length at the inner radius, for label-fit checks
    pub length: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

/// The combined output sent to the page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagramOutput {
    pub diameter: f64,
    pub center: Point,
    pub inner_radius: f64,
    pub arc_inner_radius: f64,
    pub arc_outer_radius: f64,
    pub tension: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slider: Option<SliderOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arcs: Vec<ArcOutput>,
    pub dropped_references: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SliderOutput {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
    pub handle_x: f64,
}

impl SliderOutput {
    fn new(slider: &TensionSlider, scene: &Scene) -> Self {
        Self {
            x1: slider.x1,
            x2: slider.x2,
            y: slider.y,
            handle_x: slider.handle_x(scene.tension),
        }
    }
}

impl DiagramOutput {
    pub fn from_scene(scene: &Scene, dataset: &Dataset, config: &ChartConfig) -> Self {
        let h = &dataset.hierarchy;
        let hl = &scene.highlight;

        let nodes = h
            .nodes
            .iter()
            .filter(|n| n.kind != NodeKind::Root)
            .map(|n| {
                let pos = scene.layout.position(n.nid);
                let p = pos.to_point();
                let label = n.is_leaf().then(|| {
                    let placement = LabelPlacement::for_leaf(pos, config);
                    LabelOutput {
                        transform: placement.transform(),
                        anchor: match placement.anchor {
                            TextAnchor::Start => "start".to_string(),
                            TextAnchor::End => "end".to_string(),
                        },
                        dx: placement.dx,
                    }
                });
                NodeOutput {
                    node: n.nid,
                    id: n.ident.clone(),
                    key: n.key.clone(),
                    depth: n.depth,
                    angle: pos.angle,
                    radius: pos.radius,
                    x: p.x,
                    y: p.y,
                    label,
                    upstream: hl.is_upstream(n.nid),
                    downstream: hl.is_downstream(n.nid),
                    focused: hl.focused == Some(n.nid),
                }
            })
            .collect();

        let ident = |nid: NodeId| h.node(nid).ident.clone();
        let links = hl
            .draw_order
            .iter()
            .filter_map(|&i| scene.bundles.get(i))
            .map(|b| {
                let mark = hl.marks.get(b.link).copied().unwrap_or_default();
                LinkOutput {
                    source: b.source,
                    target: b.target,
                    source_id: ident(b.source),
                    target_id: ident(b.target),
                    path: b.curve.to_svg_path(),
                    points: b.points.clone(),
                    incoming: mark.incoming,
                    outgoing: mark.outgoing,
                }
            })
            .collect();

        let arcs = scene
            .arcs
            .iter()
            .map(|a| ArcOutput {
                key: a.key.clone(),
                start_angle: a.start_angle,
                end_angle: a.end_angle,
                color_index: a.color_index,
                color: a.color.clone(),
                length: a.length_at(scene.inner_radius),
            })
            .collect();

        DiagramOutput {
            diameter: scene.viewport.diameter(),
            center: scene.center,
            inner_radius: scene.inner_radius,
            arc_inner_radius: scene.arc_band.inner_radius,
            arc_outer_radius: scene.arc_band.outer_radius,
            tension: scene.tension.value(),
            slider: Some(SliderOutput::new(&scene.slider, scene)),
            nodes,
            links,
            arcs,
            dropped_references: dataset.dropped.len(),
            error: None,
        }
    }

    pub fn from_error(err: &Error) -> Self {
        DiagramOutput {
            error: Some(ErrorInfo { message: err.to_string() }),
            ..Default::default()
        }
    }
}
