// src/mapper.rs

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::record::{DeliveryRecord, Field};

/// One source row as loaded: column name → cell.
///
/// CSV cells are always text, but other encodings may deliver numbers,
/// booleans or nulls, so cells are kept as JSON values until mapping.
/// Columns keep their source order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    cells: IndexMap<String, Value>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Keeps the first value seen for a repeated column.
    pub fn insert_if_absent(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.cells
            .entry(column.into())
            .or_insert_with(|| value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Lower-case alphanumerics only, so `" Shipment  Mode"`, `"shipment_mode"`
/// and `"ShipmentMode"` compare equal.
pub fn normalize_column(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Render any cell as text; null and missing both become `""`.
pub fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Translates raw rows into [`DeliveryRecord`]s.
///
/// Each canonical field is looked up by its exact source header first, then by
/// normalized name against both the source header and the canonical name.
/// On the normalized path the leftmost matching column wins.
#[derive(Debug, Clone)]
pub struct FieldMapper {
    keys: Vec<(Field, String, String)>,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapper {
    pub fn new() -> Self {
        let keys = Field::ALL
            .iter()
            .map(|&f| {
                (
                    f,
                    normalize_column(f.source_column()),
                    normalize_column(f.canonical_name()),
                )
            })
            .collect();
        Self { keys }
    }

    /// Never fails: columns the row lacks yield empty strings.
    pub fn map(&self, row: &RawRow) -> DeliveryRecord {
        let mut record = DeliveryRecord::default();
        for (field, source_key, canonical_key) in &self.keys {
            let cell = row
                .get(field.source_column())
                .or_else(|| Self::find_normalized(row, source_key, canonical_key));
            if let Some(value) = cell {
                *record.slot_mut(*field) = cell_to_string(value);
            }
        }
        record
    }

    fn find_normalized<'r>(
        row: &'r RawRow,
        source_key: &str,
        canonical_key: &str,
    ) -> Option<&'r Value> {
        row.cells.iter().find_map(|(name, value)| {
            let n = normalize_column(name);
            (n == source_key || n == canonical_key).then_some(value)
        })
    }
}
