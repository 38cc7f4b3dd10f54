//! Scalar field values carried by dashboard records.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;

/// A single scalar value held by a [`Record`](crate::Record) field.
///
/// Serialised untagged so a record maps directly onto a flat JSON object.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(SmolStr),
}

impl FieldValue {
    /// Numeric view of this value.
    ///
    /// Returns `None` for text, booleans and `NaN`, all of which are treated as
    /// malformed when a numeric comparison is requested.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) if !value.is_nan() => Some(*value),
            _ => None,
        }
    }

    /// Text view of this value, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Boolean view of this value, if it is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Whether this value can take part in an ordering.
    pub fn is_sortable(&self) -> bool {
        !matches!(self, FieldValue::Number(value) if value.is_nan())
    }

    /// Exact membership equality: numbers compare numerically, text byte-wise.
    pub fn matches(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a == b,
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            _ => false,
        }
    }

    /// Ordering used by the sort stage.
    ///
    /// Mixed types rank `Number < Bool < Text`. Text compares case-insensitively.
    /// `-0.0` and `0.0` compare equal, as they do under [`FieldValue::matches`].
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b))
            }
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase)),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Number(_) => 0,
            FieldValue::Bool(_) => 1,
            FieldValue::Text(_) => 2,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Bool(value) => write!(f, "{}", value),
            FieldValue::Number(value) => write!(f, "{}", value),
            FieldValue::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(SmolStr::new(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(SmolStr::from(value))
    }
}

impl From<SmolStr> for FieldValue {
    fn from(value: SmolStr) -> Self {
        FieldValue::Text(value)
    }
}
