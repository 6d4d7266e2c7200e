use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// One flat input row: field name -> string value, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record(pub IndexMap<String, String>);

/// Scalars become text; null, arrays and objects are treated as absent.
impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        Ok(Record(
            raw.into_iter()
                .filter_map(|(field, value)| cell_text(value).map(|text| (field, text)))
                .collect(),
        ))
    }
}

fn cell_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            // 2.0 prints as "2", so it matches a reference written "2"
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl Record {
    /// Build a record from `(field, value)` pairs, keeping their order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Record(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Raw field value, if present.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(|v| v.as_str())
    }

    /// Trimmed field value; `None` for absent or blank fields.
    pub fn non_blank(&self, field: &str) -> Option<&str> {
        self.get(field).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }
}

// ============================================================================
// Schema - which columns carry identity, label, category and references
// ============================================================================

/// Column names used by the original page-map dataset.
pub const DEFAULT_ID_FIELD: &str = "Page ID";
pub const DEFAULT_NAME_FIELD: &str = "Page Name";
pub const DEFAULT_CATEGORY_FIELD: &str = "Page Type";
pub const DEFAULT_REFERENCE_PREFIX: &str = "Link";

/// Explicit description of a record layout.
///
/// The core never guesses which fields are references: the loader either
/// lists them or derives them once with [`RecordSchema::with_reference_prefix`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordSchema {
    pub id_field: String,
    pub name_field: String,
    pub category_field: String,
    /// Reference columns, in the order links are emitted.
    pub reference_fields: Vec<String>,
    /// Optional numeric weight column (leaf angular share).
    pub size_field: Option<String>,
    /// Splits one reference cell into several identifiers.
    pub value_separator: Option<char>,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            id_field: DEFAULT_ID_FIELD.to_string(),
            name_field: DEFAULT_NAME_FIELD.to_string(),
            category_field: DEFAULT_CATEGORY_FIELD.to_string(),
            reference_fields: Vec::new(),
            size_field: None,
            value_separator: None,
        }
    }
}

impl RecordSchema {
    /// Append every column of `records` whose name starts with `prefix`,
    /// in first-seen column order, skipping ones already listed.
    pub fn with_reference_prefix(mut self, prefix: &str, records: &[Record]) -> Self {
        for record in records {
            for name in record.field_names() {
                if name.starts_with(prefix)
                    && !self.is_role_field(name)
                    && !self.reference_fields.iter().any(|f| f == name)
                {
                    self.reference_fields.push(name.to_string());
                }
            }
        }
        self
    }

    fn is_role_field(&self, name: &str) -> bool {
        name == self.id_field || name == self.name_field || name == self.category_field
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        for (role, value) in [
            ("id", &self.id_field),
            ("name", &self.name_field),
            ("category", &self.category_field),
        ] {
            if value.trim().is_empty() {
                return Err(SchemaError::EmptyField { role });
            }
        }

        for (i, field) in self.reference_fields.iter().enumerate() {
            let role = if *field == self.id_field {
                Some("id")
            } else if *field == self.name_field {
                Some("name")
            } else if *field == self.category_field {
                Some("category")
            } else {
                None
            };
            if let Some(role) = role {
                return Err(SchemaError::ReferenceOverlapsRole { field: field.clone(), role });
            }
            if self.reference_fields[..i].contains(field) {
                return Err(SchemaError::DuplicateReference { field: field.clone() });
            }
        }

        Ok(())
    }

    /// Split a raw reference cell into trimmed, non-empty identifiers.
    pub fn reference_values<'a>(&self, raw: &'a str) -> Vec<&'a str> {
        match self.value_separator {
            Some(sep) => raw.split(sep).map(str::trim).filter(|v| !v.is_empty()).collect(),
            None => {
                let v = raw.trim();
                if v.is_empty() { Vec::new() } else { vec![v] }
            }
        }
    }
}
