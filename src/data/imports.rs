//! Alternate input mode: a list of `{ "name": "pkg.sub.Class", "imports": [...] }`
//! entries, as used by dependency-graph datasets.
//!
//! Entries are flattened into [`Record`]s so the rest of the pipeline only
//! ever sees one shape. The dotted prefix becomes the category and the last
//! segment the display name; every import becomes its own reference column.

use serde::Deserialize;

use crate::data::{Record, RecordSchema, UNSPECIFIED_CATEGORY};
use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct ImportsEntry {
    pub name: String,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub size: Option<f64>,
}

const ID: &str = "name";
const LABEL: &str = "label";
const CATEGORY: &str = "category";
const SIZE: &str = "size";

pub fn parse_imports(json: &str) -> Result<Vec<ImportsEntry>> {
    Ok(serde_json::from_str(json)?)
}

/// Flatten entries into records plus the schema describing them.
pub fn imports_to_records(entries: &[ImportsEntry]) -> (Vec<Record>, RecordSchema) {
    let max_imports = entries.iter().map(|e| e.imports.len()).max().unwrap_or(0);

    let records = entries
        .iter()
        .map(|entry| {
            let (category, label) = match entry.name.rsplit_once('.') {
                Some((prefix, last)) if !prefix.is_empty() => (prefix, last),
                _ => (UNSPECIFIED_CATEGORY, entry.name.as_str()),
            };

            let mut pairs = vec![
                (ID.to_string(), entry.name.clone()),
                (LABEL.to_string(), label.to_string()),
                (CATEGORY.to_string(), category.to_string()),
            ];
            if let Some(size) = entry.size {
                pairs.push((SIZE.to_string(), size.to_string()));
            }
            pairs.extend(
                entry
                    .imports
                    .iter()
                    .enumerate()
                    .map(|(i, target)| (import_field(i), target.clone())),
            );
            Record::from_pairs(pairs)
        })
        .collect();

    let schema = RecordSchema {
        id_field: ID.to_string(),
        name_field: LABEL.to_string(),
        category_field: CATEGORY.to_string(),
        reference_fields: (0..max_imports).map(import_field).collect(),
        size_field: Some(SIZE.to_string()),
        value_separator: None,
    };

    (records, schema)
}

fn import_field(i: usize) -> String {
    format!("import {i}")
}
