// Link resolution: reference cells on leaf records -> (source, target) pairs.
//
// The record holding the reference is always the source. A reference that
// names no known leaf is dropped whole; it is remembered in `dropped` so the
// caller can report data-quality problems, but never fails the resolution.

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::data::{Hierarchy, NodeId, Record, RecordSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
    /// Reference column the link came from.
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    pub source: NodeId,
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkResolution {
    pub links: Vec<Link>,
    pub dropped: Vec<UnresolvedReference>,
}

#[instrument(level = "debug", skip_all)]
pub fn resolve_links(hierarchy: &Hierarchy, records: &[Record], schema: &RecordSchema) -> LinkResolution {
    let mut out = LinkResolution::default();

    for leaf in hierarchy.leaves() {
        let Some(record) = hierarchy.node(leaf).record.and_then(|i| records.get(i)) else {
            continue;
        };

        for field in &schema.reference_fields {
            let Some(raw) = record.get(field) else {
                continue;
            };
            for value in schema.reference_values(raw) {
                match hierarchy.leaf(value) {
                    Some(target) => out.links.push(Link {
                        source: leaf,
                        target,
                        field: field.clone(),
                    }),
                    None => {
                        debug!(source = leaf.0, %field, %value, "dropping unresolved reference");
                        out.dropped.push(UnresolvedReference {
                            source: leaf,
                            field: field.clone(),
                            value: value.to_string(),
                        });
                    }
                }
            }
        }
    }

    if !out.dropped.is_empty() {
        warn!(
            dropped = out.dropped.len(),
            resolved = out.links.len(),
            "some references did not resolve to a known record"
        );
    }
    out
}
