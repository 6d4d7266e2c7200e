// Edge bundling geometry.
//
// A link's control polygon runs from its source up the tree to the lowest
// common ancestor and back down to its target. The polygon is straightened
// toward the source->target chord by `1 - tension` and then drawn as a
// uniform cubic B-spline, emitted as Bezier segments.
//
// tension = 1 -> curve pulled through every ancestor
// tension = 0 -> every control point on the chord, so the curve is the chord

use std::fmt::Write as _;

use serde::Serialize;
use tracing::instrument;

use crate::data::{Hierarchy, Link, NodeId};
use super::{ClusterLayout, Point};

pub const DEFAULT_TENSION: f64 = 0.85;

/// Bundle strength, always within [0, 1].
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Tension(f64);

impl Tension {
    /// Clamp `value` into [0, 1]; `None` for NaN.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_nan() { None } else { Some(Tension(value.clamp(0.0, 1.0))) }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Tension {
    fn default() -> Self {
        Tension(DEFAULT_TENSION)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Line { to: Point },
    Cubic { c1: Point, c2: Point, to: Point },
}

impl Segment {
    pub fn end(&self) -> Point {
        match *self {
            Segment::Line { to } | Segment::Cubic { to, .. } => to,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Curve {
    pub start: Option<Point>,
    pub segments: Vec<Segment>,
}

impl Curve {
    /// SVG path data (`M`, `L`, `C` commands).
    pub fn to_svg_path(&self) -> String {
        let mut d = String::new();
        let Some(start) = self.start else {
            return d;
        };
        let _ = write!(d, "M{},{}", fmt_num(start.x), fmt_num(start.y));
        for seg in &self.segments {
            let _ = match *seg {
                Segment::Line { to } => write!(d, "L{},{}", fmt_num(to.x), fmt_num(to.y)),
                Segment::Cubic { c1, c2, to } => write!(
                    d,
                    "C{},{},{},{},{},{}",
                    fmt_num(c1.x),
                    fmt_num(c1.y),
                    fmt_num(c2.x),
                    fmt_num(c2.y),
                    fmt_num(to.x),
                    fmt_num(to.y)
                ),
            };
        }
        d
    }
}

/// Round to 3 decimals and drop trailing zeros to keep path strings short.
fn fmt_num(v: f64) -> String {
    let r = (v * 1000.0).round() / 1000.0;
    // avoid "-0"
    let r = if r == 0.0 { 0.0 } else { r };
    format!("{r}")
}

/// Source, ancestors up to the LCA, then down to the target.
pub fn bundle_path(hierarchy: &Hierarchy, source: NodeId, target: NodeId) -> Vec<NodeId> {
    let lca = hierarchy.lowest_common_ancestor(source, target);

    let mut up = Vec::new();
    let mut cur = source;
    up.push(cur);
    while cur != lca {
        match hierarchy.node(cur).parent {
            Some(p) => cur = p,
            None => break,
        }
        up.push(cur);
    }

    let mut down = Vec::new();
    let mut cur = target;
    while cur != lca {
        down.push(cur);
        match hierarchy.node(cur).parent {
            Some(p) => cur = p,
            None => break,
        }
    }
    down.reverse();

    up.extend(down);
    up
}

/// Pull each control point toward the straight chord by `1 - tension`.
pub fn straighten(points: &[Point], tension: Tension) -> Vec<Point> {
    let n = points.len().saturating_sub(1);
    if n == 0 {
        return points.to_vec();
    }
    let beta = tension.value();
    let (first, last) = (points[0], points[n]);
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let on_chord = first.lerp(last, i as f64 / n as f64);
            on_chord.lerp(p, beta)
        })
        .collect()
}

const BASIS_C1: [f64; 4] = [0.0, 2.0 / 3.0, 1.0 / 3.0, 0.0];
const BASIS_C2: [f64; 4] = [0.0, 1.0 / 3.0, 2.0 / 3.0, 0.0];
const BASIS_END: [f64; 4] = [0.0, 1.0 / 6.0, 2.0 / 3.0, 1.0 / 6.0];

fn dot4(w: [f64; 4], p: &[Point; 4]) -> Point {
    Point {
        x: w[0] * p[0].x + w[1] * p[1].x + w[2] * p[2].x + w[3] * p[3].x,
        y: w[0] * p[0].y + w[1] * p[1].y + w[2] * p[2].y + w[3] * p[3].y,
    }
}

/// Uniform cubic B-spline through `points`, clamped to both endpoints.
/// Fewer than three points degrade to a polyline.
pub fn basis_curve(points: &[Point]) -> Curve {
    let Some(&first) = points.first() else {
        return Curve::default();
    };
    if points.len() < 3 {
        return Curve {
            start: Some(first),
            segments: points[1..].iter().map(|&to| Segment::Line { to }).collect(),
        };
    }

    let n = points.len();
    let last = points[n - 1];
    let mut window = [first, first, first, points[1]];
    let mut segments = vec![Segment::Line { to: dot4(BASIS_END, &window) }];

    for i in 2..=n {
        let next = if i < n { points[i] } else { last };
        window.rotate_left(1);
        window[3] = next;
        segments.push(Segment::Cubic {
            c1: dot4(BASIS_C1, &window),
            c2: dot4(BASIS_C2, &window),
            to: dot4(BASIS_END, &window),
        });
    }
    segments.push(Segment::Line { to: last });

    Curve { start: Some(first), segments }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundledLink {
    /// Index into the link list.
    pub link: usize,
    pub source: NodeId,
    pub target: NodeId,
    pub control: Vec<NodeId>,
    /// Control points after straightening, chart-center relative.
    pub points: Vec<Point>,
    pub curve: Curve,
}

#[instrument(level = "debug", skip(hierarchy, layout, links), fields(links = links.len()))]
pub fn bundle_links(hierarchy: &Hierarchy, layout: &ClusterLayout, links: &[Link], tension: Tension) -> Vec<BundledLink> {
    links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            let control = bundle_path(hierarchy, link.source, link.target);
            let raw: Vec<Point> = control.iter().map(|&nid| layout.position(nid).to_point()).collect();
            let points = straighten(&raw, tension);
            let curve = basis_curve(&points);
            BundledLink {
                link: i,
                source: link.source,
                target: link.target,
                control,
                points,
                curve,
            }
        })
        .collect()
}
