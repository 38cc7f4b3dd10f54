//! Export field catalogue and per-field value formatting.

use crate::options::{DateFormat, NumberFormat};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use derive_more::Display;
use edgeboard_pipeline::FieldValue;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// How a field's values are rendered.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    #[serde(alias = "string")]
    #[display("text")]
    Text,
    #[display("number")]
    Number,
    #[display("boolean")]
    Boolean,
    #[display("date")]
    Date,
}

/// A field that may be exported, with its column label.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExportField {
    /// Record field name
    pub key: SmolStr,
    /// Human-readable column header
    pub label: String,
    /// Rendering kind
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
}

impl ExportField {
    pub fn new(key: impl Into<SmolStr>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
        }
    }

    pub fn text(key: impl Into<SmolStr>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub fn number(key: impl Into<SmolStr>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Number)
    }

    pub fn boolean(key: impl Into<SmolStr>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Boolean)
    }

    pub fn date(key: impl Into<SmolStr>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldKind::Date)
    }

    /// Render a value of this field. A missing value renders as the empty string.
    pub fn format(
        &self,
        value: Option<&FieldValue>,
        numbers: NumberFormat,
        dates: DateFormat,
    ) -> String {
        let Some(value) = value else {
            return String::new();
        };

        match self.kind {
            FieldKind::Text => value.to_string(),
            FieldKind::Number => match value.as_number() {
                Some(number) => numbers.render(number),
                None => value.to_string(),
            },
            FieldKind::Boolean => String::from(if truthy(value) { "Yes" } else { "No" }),
            FieldKind::Date => match value.as_text().and_then(parse_date) {
                Some(date) => dates.render(&date),
                None => value.to_string(),
            },
        }
    }
}

fn truthy(value: &FieldValue) -> bool {
    match value {
        FieldValue::Bool(flag) => *flag,
        FieldValue::Number(number) => *number != 0.0 && !number.is_nan(),
        FieldValue::Text(text) => !text.is_empty(),
    }
}

/// Parse RFC 3339, a zone-less `YYYY-MM-DDTHH:MM:SS` or a bare `YYYY-MM-DD`.
///
/// Offset timestamps keep their own wall-clock time; they are not shifted to UTC.
fn parse_date(text: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(text, pattern).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
