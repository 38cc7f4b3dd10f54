use super::{Metadata, Table};
use crate::{error::ExportError, field::FieldKind};
use indexmap::IndexMap;
use serde::Serialize;

type Row<'a> = IndexMap<&'a str, &'a str>;

#[derive(Serialize)]
struct Envelope<'a> {
    data: Vec<Row<'a>>,
    metadata: EnvelopeMetadata<'a>,
}

#[derive(Serialize)]
struct EnvelopeMetadata<'a> {
    total_records: usize,
    fields: Vec<FieldEntry<'a>>,
    export_date: String,
    format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

#[derive(Serialize)]
struct FieldEntry<'a> {
    key: &'a str,
    label: &'a str,
    #[serde(rename = "type")]
    kind: FieldKind,
}

/// Render `table` as pretty-printed JSON.
///
/// With metadata the rows are wrapped as `{"data": [...], "metadata": {...}}`,
/// otherwise the output is the bare array of row objects.
pub fn render(
    table: &Table<'_>,
    metadata: &Metadata,
    include_metadata: bool,
) -> Result<String, ExportError> {
    let data = table
        .rows
        .iter()
        .map(|row| {
            table
                .cells(row)
                .map(|(field, cell)| (field.key.as_str(), cell))
                .collect::<Row<'_>>()
        })
        .collect::<Vec<_>>();

    if !include_metadata {
        return serde_json::to_string_pretty(&data).map_err(ExportError::from);
    }

    let envelope = Envelope {
        metadata: EnvelopeMetadata {
            total_records: data.len(),
            fields: table
                .fields
                .iter()
                .map(|field| FieldEntry {
                    key: field.key.as_str(),
                    label: field.label.as_str(),
                    kind: field.kind,
                })
                .collect(),
            export_date: metadata.exported_at.to_rfc3339(),
            format: metadata.format.to_string(),
            title: metadata.title.as_deref(),
        },
        data,
    };

    serde_json::to_string_pretty(&envelope).map_err(ExportError::from)
}
