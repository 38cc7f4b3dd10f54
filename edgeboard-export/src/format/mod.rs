//! Format renderers. Each consumes an already formatted [`Table`].

use crate::{field::ExportField, options::ExportFormat};
use chrono::{DateTime, Utc};

/// RFC 4180 CSV rendering.
pub mod csv;

/// JSON rendering with an optional metadata envelope.
pub mod json;

/// XML rendering with an optional metadata element.
pub mod xml;

/// Selected columns and their formatted cell values, in export order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<'a> {
    pub fields: Vec<&'a ExportField>,
    pub rows: Vec<Vec<String>>,
}

impl Table<'_> {
    /// Iterate `(field, cell)` pairs of one row.
    pub fn cells<'r>(&'r self, row: &'r [String]) -> impl Iterator<Item = (&'r ExportField, &'r str)> {
        self.fields.iter().map(|field| &**field).zip(row.iter().map(String::as_str))
    }
}

/// Describes an export in the JSON and XML metadata blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub format: ExportFormat,
    pub exported_at: DateTime<Utc>,
    pub title: Option<String>,
}
