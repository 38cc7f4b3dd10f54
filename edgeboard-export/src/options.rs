//! Export configuration.

use chrono::NaiveDateTime;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Output file format.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    #[display("csv")]
    Csv,
    #[display("json")]
    Json,
    #[display("xml")]
    Xml,
}

impl ExportFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Xml => "application/xml",
        }
    }
}

/// Rendering of numeric fields.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum NumberFormat {
    /// Two decimal places
    #[default]
    #[serde(rename = "0.00")]
    TwoDecimals,
    /// Truncated to an integer
    #[serde(rename = "0")]
    Integer,
    /// Shortest round-trip representation
    #[serde(rename = "raw")]
    Raw,
}

impl NumberFormat {
    pub fn render(&self, value: f64) -> String {
        match self {
            NumberFormat::TwoDecimals => format!("{:.2}", value),
            NumberFormat::Integer => format!("{}", value.trunc() as i64),
            NumberFormat::Raw => value.to_string(),
        }
    }
}

/// Rendering of date fields.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "YYYY-MM-DD")]
    IsoDate,
    #[serde(rename = "MM/DD/YYYY")]
    UsDate,
    #[serde(rename = "DD/MM/YYYY")]
    EuDate,
    #[serde(rename = "YYYY-MM-DD HH:mm:ss")]
    DateTime,
    /// Full ISO 8601 timestamp
    #[serde(rename = "iso")]
    Iso,
}

impl DateFormat {
    pub fn render(&self, value: &NaiveDateTime) -> String {
        let pattern = match self {
            DateFormat::IsoDate => "%Y-%m-%d",
            DateFormat::UsDate => "%m/%d/%Y",
            DateFormat::EuDate => "%d/%m/%Y",
            DateFormat::DateTime => "%Y-%m-%d %H:%M:%S",
            DateFormat::Iso => "%Y-%m-%dT%H:%M:%S",
        };
        value.format(pattern).to_string()
    }
}

/// Options controlling a single export.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Allow-list of field keys to include
    pub fields: Vec<SmolStr>,
    /// Emit a header row (CSV) of field labels
    pub include_headers: bool,
    /// Wrap the data with a metadata block (JSON, XML)
    pub include_metadata: bool,
    pub number_format: NumberFormat,
    pub date_format: DateFormat,
    /// File name without extension; generated from the export time when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Title recorded in the metadata block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            fields: Vec::new(),
            include_headers: true,
            include_metadata: true,
            number_format: NumberFormat::TwoDecimals,
            date_format: DateFormat::IsoDate,
            filename: None,
            title: None,
        }
    }
}

impl ExportOptions {
    pub fn new<I, F>(format: ExportFormat, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<SmolStr>,
    {
        Self {
            format,
            fields: fields.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExportOptions::default();
        assert_eq!(options.format, ExportFormat::Csv);
        assert!(options.include_headers);
        assert!(options.include_metadata);
        assert_eq!(options.number_format, NumberFormat::TwoDecimals);
        assert_eq!(options.date_format, DateFormat::IsoDate);
    }

    #[test]
    fn test_options_json_shape() {
        let options: ExportOptions = serde_json::from_str(
            r#"{"format":"json","fields":["roi","sport"],"number_format":"0","date_format":"MM/DD/YYYY"}"#,
        )
        .unwrap();

        assert_eq!(options.format, ExportFormat::Json);
        assert_eq!(options.fields, vec![SmolStr::new("roi"), SmolStr::new("sport")]);
        assert_eq!(options.number_format, NumberFormat::Integer);
        assert_eq!(options.date_format, DateFormat::UsDate);
        assert!(options.include_headers);
    }

    #[test]
    fn test_integer_format_truncates() {
        assert_eq!(NumberFormat::Integer.render(-2.9), "-2");
        assert_eq!(NumberFormat::TwoDecimals.render(3.0), "3.00");
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Xml.extension(), "xml");
        assert_eq!(ExportFormat::Json.mime_type(), "application/json");
        assert_eq!(ExportFormat::Csv.to_string(), "csv");
    }
}
