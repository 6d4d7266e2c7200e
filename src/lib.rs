//! Hierarchical edge bundling core.
//!
//! Turns flat records into a radial, category-grouped diagram: leaf
//! positions, category arcs, bundled link curves and hover highlighting.
//! Drawing is left to the page; see [`wasm`] for the JS-facing API.

pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod highlight;
pub mod layout;
pub mod output;
pub mod wasm;

#[cfg(test)]
mod fixtures;

pub use chart::{render_scene, Chart, Command, Dataset, Scene};
pub use config::ChartConfig;
pub use error::{Error, Result, SchemaError};
pub use layout::{Tension, Viewport};
pub use output::DiagramOutput;
