// Shared test data.

use crate::data::{build_hierarchy, Hierarchy, Record, RecordSchema};

/// Categories A, B, C with {2, 3, 1} leaves; A1 references B1, B2
/// references the missing "99", C1 references A2 and B3.
pub fn make_records() -> Vec<Record> {
    let rows = [
        ("a1", "A1", "A", "b1", ""),
        ("a2", "A2", "A", "", ""),
        ("b1", "B1", "B", "", ""),
        ("b2", "B2", "B", "99", ""),
        ("b3", "B3", "B", "", ""),
        ("c1", "C1", "C", "a2", "b3"),
    ];
    rows.iter()
        .map(|(id, name, cat, l1, l2)| {
            Record::from_pairs([
                ("Page ID", *id),
                ("Page Name", *name),
                ("Page Type", *cat),
                ("Link 1", *l1),
                ("Link 2", *l2),
            ])
        })
        .collect()
}

pub fn make_schema() -> RecordSchema {
    RecordSchema::default().with_reference_prefix("Link", &make_records())
}

pub fn make_hierarchy() -> Hierarchy {
    build_hierarchy(&make_records(), &make_schema())
}
