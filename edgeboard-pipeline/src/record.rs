//! Flat dashboard records.

use crate::value::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::debug;

/// A flat mapping of named fields to scalar values.
///
/// The `id` is an opaque rendering key with no identity semantics. Field order is
/// preserved so exports and debug output follow the order the source produced.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Record {
    /// Opaque identifier used only as a rendering key
    pub id: SmolStr,
    /// Named scalar fields
    #[serde(flatten)]
    fields: IndexMap<SmolStr, FieldValue>,
}

impl Record {
    /// Create an empty record.
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self {
            id: id.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field insertion.
    pub fn with(mut self, field: impl Into<SmolStr>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a field value.
    pub fn insert(&mut self, field: impl Into<SmolStr>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Get a field value by name.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Get a field as a number. Missing or non-numeric fields yield `None`.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }

    /// Get a field as text.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Iterate fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&SmolStr, &FieldValue)> {
        self.fields.iter()
    }

    /// Number of fields, excluding the id.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a record from an arbitrary JSON object.
    ///
    /// Scalar members become fields. `null`, arrays and nested objects are
    /// dropped. The `id` member may be a string or a number; when absent,
    /// `fallback_id` is used. Returns `None` if `value` is not an object.
    pub fn from_json(value: serde_json::Value, fallback_id: impl Into<SmolStr>) -> Option<Self> {
        let serde_json::Value::Object(object) = value else {
            return None;
        };

        let mut record = Record::new(fallback_id);
        for (key, member) in object {
            if key == "id" {
                match member {
                    serde_json::Value::String(id) => record.id = SmolStr::from(id),
                    serde_json::Value::Number(id) => record.id = SmolStr::from(id.to_string()),
                    other => debug!(?other, "Ignoring non-scalar record id"),
                }
                continue;
            }

            match member {
                serde_json::Value::Bool(flag) => record.insert(key, flag),
                serde_json::Value::Number(number) => match number.as_f64() {
                    Some(number) => record.insert(key, number),
                    None => debug!(field = %key, "Dropping unrepresentable number"),
                },
                serde_json::Value::String(text) => record.insert(key, text),
                serde_json::Value::Null => {}
                _ => debug!(field = %key, "Dropping non-scalar field"),
            }
        }

        Some(record)
    }
}
