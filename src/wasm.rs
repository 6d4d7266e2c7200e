//! WASM bindings for the bundle-core library.
//!
//! The page owns one [`EdgeBundlingChart`] per diagram and forwards its
//! events to it. Every method returns the full diagram as a JSON string.

use wasm_bindgen::prelude::*;
use serde_json::to_string;

use crate::chart::{Chart, Command};
use crate::config::ChartConfig;
use crate::data::{
    imports_to_records, parse_imports, NodeId, Record, RecordSchema, DEFAULT_REFERENCE_PREFIX,
};
use crate::error::{Error, Result};
use crate::output::DiagramOutput;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

#[wasm_bindgen]
pub struct EdgeBundlingChart {
    chart: Chart,
}

#[wasm_bindgen]
impl EdgeBundlingChart {
    /// Create a chart from a JSON config object. An invalid config is
    /// reported on the console and replaced by the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> EdgeBundlingChart {
        let config = ChartConfig::from_json(config_json).unwrap_or_else(|e| {
            console_error(&format!("Error reading chart config: {}", e));
            ChartConfig::default()
        });
        EdgeBundlingChart { chart: Chart::new(config) }
    }

    /// Load tabular records (array of string-valued objects). `schema_json`
    /// may be empty; reference columns are then taken from the `Link` prefix.
    pub fn load_records(&mut self, records_json: &str, schema_json: &str) -> String {
        let command = parse_records(records_json, schema_json).map(|(records, schema)| Command::Load { records, schema });
        self.apply(command)
    }

    /// Load a `[{ name, imports }]` hierarchy.
    pub fn load_imports(&mut self, json: &str) -> String {
        let command = parse_imports(json).map(|entries| {
            let (records, schema) = imports_to_records(&entries);
            Command::Load { records, schema }
        });
        self.apply(command)
    }

    pub fn resize(&mut self, width: f64, height: f64) -> String {
        self.apply(Ok(Command::Resize { width, height }))
    }

    pub fn set_tension(&mut self, value: f64) -> String {
        self.apply(Ok(Command::TensionChanged { value }))
    }

    pub fn drag_tension(&mut self, dx: f64) -> String {
        self.apply(Ok(Command::TensionDragged { dx }))
    }

    pub fn focus_leaf(&mut self, id: &str) -> String {
        self.apply(Ok(Command::LeafFocused { id: id.to_string() }))
    }

    /// Focus by node handle (`node` in the diagram output). Use this for
    /// leaves without a unique identifier.
    pub fn focus_node(&mut self, node: usize) -> String {
        self.apply(Ok(Command::NodeFocused { node: NodeId(node) }))
    }

    pub fn unfocus(&mut self) -> String {
        self.apply(Ok(Command::LeafUnfocused))
    }

    /// Current diagram without changing any state.
    pub fn render(&self) -> String {
        self.output()
    }

    pub fn tension(&self) -> f64 {
        self.chart.tension().value()
    }

    /// Whether a label the page measured at `label_width` pixels fits on
    /// the arc at `index`.
    pub fn arc_label_fits(&self, index: usize, label_width: f64) -> bool {
        self.chart.arc_label_fits(index, label_width)
    }
}

impl EdgeBundlingChart {
    fn apply(&mut self, command: Result<Command>) -> String {
        let is_load = matches!(command, Ok(Command::Load { .. }));
        match command.and_then(|c| self.chart.dispatch(c)) {
            Ok(_) => {
                if is_load {
                    let ds = self.chart.dataset();
                    console_log(&format!(
                        "Loaded {} records: {} links, {} unresolved references",
                        ds.records.len(),
                        ds.links.len(),
                        ds.dropped.len()
                    ));
                }
                self.output()
            }
            Err(e) => error_json(&e),
        }
    }

    fn output(&self) -> String {
        let output = DiagramOutput::from_scene(&self.chart.scene(), self.chart.dataset(), self.chart.config());
        to_string(&output).unwrap_or_else(|e| error_json(&Error::Json(e)))
    }
}

fn parse_records(records_json: &str, schema_json: &str) -> Result<(Vec<Record>, RecordSchema)> {
    let records: Vec<Record> = serde_json::from_str(records_json)?;
    let schema = if schema_json.trim().is_empty() {
        RecordSchema::default().with_reference_prefix(DEFAULT_REFERENCE_PREFIX, &records)
    } else {
        serde_json::from_str(schema_json)?
    };
    Ok((records, schema))
}

fn error_json(err: &Error) -> String {
    console_error(&format!("Error updating chart: {}", err));
    to_string(&DiagramOutput::from_error(err)).unwrap_or_else(|_| "{\"error\": {\"message\": \"serialization error\"}}".to_string())
}
