//! Chart state and the single update entry point.
//!
//! The host page turns DOM events into [`Command`]s and calls
//! [`Chart::dispatch`]. Every command re-derives the whole scene from the
//! loaded records, the viewport and the tension; nothing geometric survives
//! from one command to the next.

use tracing::{debug, instrument};

use crate::config::ChartConfig;
use crate::data::{
    build_hierarchy, resolve_links, Hierarchy, Link, NodeId, Record, RecordSchema,
    UnresolvedReference,
};
use crate::error::Result;
use crate::highlight::{compute_highlight, Highlight, Highlighter};
use crate::layout::{
    aggregate_arcs, bundle_links, cluster_layout, Arc, ArcBand, BundledLink, ClusterLayout, Point,
    Tension, TensionSlider, Viewport, FULL_CIRCLE,
};

/// Loaded, validated input. Hierarchy and links depend only on the records,
/// so they are built once per load.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub schema: RecordSchema,
    pub hierarchy: Hierarchy,
    pub links: Vec<Link>,
    pub dropped: Vec<UnresolvedReference>,
}

impl Dataset {
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn load(records: Vec<Record>, schema: RecordSchema) -> Result<Self> {
        schema.validate()?;
        let hierarchy = build_hierarchy(&records, &schema);
        let resolution = resolve_links(&hierarchy, &records, &schema);
        debug!(
            links = resolution.links.len(),
            dropped = resolution.dropped.len(),
            "dataset loaded"
        );
        Ok(Self {
            records,
            schema,
            hierarchy,
            links: resolution.links,
            dropped: resolution.dropped,
        })
    }

    pub fn empty() -> Self {
        let schema = RecordSchema::default();
        Self {
            hierarchy: build_hierarchy(&[], &schema),
            records: Vec::new(),
            schema,
            links: Vec::new(),
            dropped: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    Load { records: Vec<Record>, schema: RecordSchema },
    Resize { width: f64, height: f64 },
    TensionChanged { value: f64 },
    /// Handle dragged by `dx` pixels along the slider track.
    TensionDragged { dx: f64 },
    /// Pointer entered the leaf with this record identifier.
    LeafFocused { id: String },
    /// Pointer entered the node with this handle. Works for leaves whose
    /// identifier is missing or shared with an earlier record.
    NodeFocused { node: NodeId },
    LeafUnfocused,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub viewport: Viewport,
    pub center: Point,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub tension: Tension,
    pub layout: ClusterLayout,
    pub arcs: Vec<Arc>,
    pub arc_band: ArcBand,
    pub bundles: Vec<BundledLink>,
    pub highlight: Highlight,
    pub slider: TensionSlider,
}

/// Pure scene derivation: same inputs, same scene.
pub fn render_scene(
    dataset: &Dataset,
    viewport: Viewport,
    tension: Tension,
    highlighter: &Highlighter,
    cfg: &ChartConfig,
) -> Scene {
    let inner_radius = viewport.inner_radius(cfg);
    let layout = cluster_layout(&dataset.hierarchy, FULL_CIRCLE, inner_radius, cfg.group_gap);
    let arcs = aggregate_arcs(&dataset.hierarchy, &layout, cfg);
    let bundles = bundle_links(&dataset.hierarchy, &layout, &dataset.links, tension);
    let highlight = compute_highlight(&dataset.links, highlighter.focused());

    Scene {
        viewport,
        center: viewport.center(),
        outer_radius: viewport.outer_radius(),
        inner_radius,
        tension,
        layout,
        arcs,
        arc_band: ArcBand::new(inner_radius, cfg),
        bundles,
        highlight,
        slider: TensionSlider::new(&viewport, cfg),
    }
}

#[derive(Debug, Clone)]
pub struct Chart {
    config: ChartConfig,
    dataset: Dataset,
    viewport: Viewport,
    tension: Tension,
    highlighter: Highlighter,
}

impl Chart {
    pub fn new(config: ChartConfig) -> Self {
        let tension = Tension::new(config.tension).unwrap_or_default();
        Self {
            config,
            dataset: Dataset::empty(),
            viewport: Viewport::default(),
            tension,
            highlighter: Highlighter::new(),
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn tension(&self) -> Tension {
        self.tension
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Apply one command and return the freshly derived scene. A failed load
    /// leaves the previous dataset in place.
    pub fn dispatch(&mut self, command: Command) -> Result<Scene> {
        match command {
            Command::Load { records, schema } => {
                self.dataset = Dataset::load(records, schema)?;
                self.highlighter.leave();
            }
            Command::Resize { width, height } => {
                self.viewport = Viewport::new(width, height);
            }
            Command::TensionChanged { value } => {
                if let Some(t) = Tension::new(value) {
                    self.tension = t;
                }
            }
            Command::TensionDragged { dx } => {
                let slider = TensionSlider::new(&self.viewport, &self.config);
                self.tension = slider.drag(self.tension, dx);
            }
            Command::LeafFocused { id } => match self.dataset.hierarchy.leaf(&id) {
                Some(nid) => self.highlighter.enter(&self.dataset.hierarchy, nid),
                None => {
                    debug!(%id, "focus on unknown leaf");
                    self.highlighter.leave();
                }
            },
            Command::NodeFocused { node } => self.highlighter.enter(&self.dataset.hierarchy, node),
            Command::LeafUnfocused => self.highlighter.leave(),
        }
        Ok(self.scene())
    }

    pub fn scene(&self) -> Scene {
        render_scene(&self.dataset, self.viewport, self.tension, &self.highlighter, &self.config)
    }

    /// Whether a category label measured at `label_width` by the page fits
    /// along arc `index` at the inner radius.
    pub fn arc_label_fits(&self, index: usize, label_width: f64) -> bool {
        let scene = self.scene();
        scene.arcs.get(index).is_some_and(|arc| {
            arc.label_fits(label_width, scene.inner_radius, self.config.arc_labels_padding)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, SchemaError};
    use crate::fixtures::{make_records, make_schema};
    use crate::highlight::FocusState;

    fn make_chart() -> Chart {
        let mut chart = Chart::new(ChartConfig::default());
        chart
            .dispatch(Command::Load { records: make_records(), schema: make_schema() })
            .unwrap();
        chart.dispatch(Command::Resize { width: 800.0, height: 800.0 }).unwrap();
        chart
    }

    #[test]
    fn test_scenario_two_three_one() {
        let mut chart = make_chart();
        let scene = chart.dispatch(Command::TensionChanged { value: 0.85 }).unwrap();
        let h = &chart.dataset().hierarchy;

        // exactly one link out of A1, to B1
        let a1 = h.leaf("a1").unwrap();
        let from_a1: Vec<&Link> = chart.dataset().links.iter().filter(|l| l.source == a1).collect();
        assert_eq!(from_a1.len(), 1);
        assert_eq!(from_a1[0].target, h.leaf("b1").unwrap());

        // six equal slices of 60 degrees
        for leaf in h.leaves() {
            assert!((scene.layout.slice(leaf).unwrap().width() - 60.0).abs() < 1e-9);
        }

        // A's arc starts at its first leaf, moved by the seam inset and the half offset
        let first = scene.layout.position(a1).angle;
        let expected = (first + 0.5 - 2.0).to_radians();
        assert!((scene.arcs[0].start_angle - expected).abs() < 1e-9);
    }

    #[test]
    fn test_dangling_reference_counted() {
        let chart = make_chart();
        // four non-empty reference cells, one dangling
        assert_eq!(chart.dataset().links.len(), 3);
        assert_eq!(chart.dataset().dropped.len(), 1);
    }

    #[test]
    fn test_resize_recomputes_radii() {
        let mut chart = make_chart();
        let scene = chart.dispatch(Command::Resize { width: 600.0, height: 1000.0 }).unwrap();
        assert_eq!(scene.outer_radius, 300.0);
        assert_eq!(scene.inner_radius, 180.0);
        assert_eq!(scene.center, Point { x: 300.0, y: 300.0 });
        assert_eq!(scene.arc_band.inner_radius, 185.0);
        assert_eq!(scene.arc_band.outer_radius, 215.0);
    }

    #[test]
    fn test_extreme_drag_keeps_tension_in_range() {
        let mut chart = make_chart();
        let scene = chart.dispatch(Command::TensionDragged { dx: 1e12 }).unwrap();
        assert_eq!(scene.tension.value(), 1.0);
        let scene = chart.dispatch(Command::TensionDragged { dx: -1e12 }).unwrap();
        assert_eq!(scene.tension.value(), 0.0);
        let scene = chart.dispatch(Command::TensionChanged { value: f64::NAN }).unwrap();
        assert_eq!(scene.tension.value(), 0.0);
    }

    #[test]
    fn test_focus_by_identifier() {
        let mut chart = make_chart();
        let scene = chart.dispatch(Command::LeafFocused { id: "c1".to_string() }).unwrap();
        assert_eq!(scene.highlight.downstream.len(), 2);

        let scene = chart.dispatch(Command::LeafFocused { id: "nope".to_string() }).unwrap();
        assert_eq!(chart.highlighter().state(), FocusState::Idle);
        assert!(scene.highlight.focused.is_none());

        chart.dispatch(Command::LeafFocused { id: "a1".to_string() }).unwrap();
        let scene = chart.dispatch(Command::LeafUnfocused).unwrap();
        assert!(scene.highlight.marks.iter().all(|m| !m.is_highlighted()));
    }

    #[test]
    fn test_focus_by_node_handle() {
        let records = vec![
            Record::from_pairs([("Page ID", "1"), ("Page Name", "First"), ("Page Type", "A"), ("Link 1", "2")]),
            Record::from_pairs([("Page ID", "1"), ("Page Name", "Dup"), ("Page Type", "A"), ("Link 1", "2")]),
            Record::from_pairs([("Page ID", "2"), ("Page Name", "Two"), ("Page Type", "B")]),
            Record::from_pairs([("Page Name", "Nameless"), ("Page Type", "B"), ("Link 1", "2")]),
        ];
        let schema = RecordSchema { reference_fields: vec!["Link 1".to_string()], ..RecordSchema::default() };
        let mut chart = Chart::new(ChartConfig::default());
        chart.dispatch(Command::Load { records, schema }).unwrap();

        let h = &chart.dataset().hierarchy;
        let leaf_named = |name: &str| h.leaves().find(|&n| h.node(n).key == name).unwrap();
        let (first, dup, two, nameless) =
            (leaf_named("First"), leaf_named("Dup"), leaf_named("Two"), leaf_named("Nameless"));
        let category = h.node(two).parent.unwrap();
        assert_ne!(first, dup);
        assert_eq!(h.leaf("1"), Some(first));

        let scene = chart.dispatch(Command::NodeFocused { node: dup }).unwrap();
        assert_eq!(scene.highlight.focused, Some(dup));
        assert_eq!(scene.highlight.downstream, vec![two]);

        let scene = chart.dispatch(Command::NodeFocused { node: nameless }).unwrap();
        assert_eq!(scene.highlight.focused, Some(nameless));
        assert_eq!(scene.highlight.downstream, vec![two]);

        // categories and out-of-range handles clear the focus
        chart.dispatch(Command::NodeFocused { node: category }).unwrap();
        assert_eq!(chart.highlighter().state(), FocusState::Idle);
        chart.dispatch(Command::NodeFocused { node: NodeId(10_000) }).unwrap();
        assert_eq!(chart.highlighter().state(), FocusState::Idle);
    }

    #[test]
    fn test_arc_label_fit_at_inner_radius() {
        let chart = make_chart();
        // inner radius 280; A spans 61.5 degrees, about 300px
        assert!(chart.arc_label_fits(0, 250.0));
        assert!(!chart.arc_label_fits(0, 295.0));
        assert!(!chart.arc_label_fits(3, 1.0));
    }

    #[test]
    fn test_same_inputs_same_scene() {
        let chart = make_chart();
        assert_eq!(chart.scene(), chart.scene());

        let mut other = make_chart();
        other.dispatch(Command::TensionChanged { value: 0.2 }).unwrap();
        let back = other.dispatch(Command::TensionChanged { value: 0.85 }).unwrap();
        assert_eq!(chart.scene(), back);
    }

    #[test]
    fn test_empty_chart_renders_nothing() {
        let mut chart = Chart::new(ChartConfig::default());
        let scene = chart.dispatch(Command::Resize { width: 400.0, height: 400.0 }).unwrap();
        assert!(scene.arcs.is_empty());
        assert!(scene.bundles.is_empty());
        assert_eq!(scene.layout.positions.len(), 1);

        let scene = chart
            .dispatch(Command::Load { records: Vec::new(), schema: RecordSchema::default() })
            .unwrap();
        assert!(scene.arcs.is_empty());
    }

    #[test]
    fn test_bad_schema_keeps_previous_dataset() {
        let mut chart = make_chart();
        let schema = RecordSchema { id_field: String::new(), ..RecordSchema::default() };
        let err = chart.dispatch(Command::Load { records: make_records(), schema }).unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::EmptyField { role: "id" })));
        assert_eq!(chart.dataset().links.len(), 3);
    }
}
