//! Export packaging: field selection, formatting and file naming.

use crate::{
    error::ExportError,
    field::ExportField,
    format::{self, Metadata, Table},
    options::{ExportFormat, ExportOptions},
};
use chrono::{DateTime, Utc};
use edgeboard_pipeline::Record;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Packages records into a downloadable [`ExportArtifact`].
///
/// By default the export time is read from the wall clock when
/// [`Exporter::export`] is called. [`Exporter::at`] pins it, which makes
/// generated filenames and metadata reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exporter {
    fixed_time: Option<DateTime<Utc>>,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exporter whose every export is stamped with `time`.
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            fixed_time: Some(time),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_time.unwrap_or_else(Utc::now)
    }

    /// Export `records` in their given order.
    ///
    /// Only the fields named in `options.fields` are included. Columns follow
    /// the order of the `available` catalogue, not the allow-list.
    ///
    /// # Errors
    /// - [`ExportError::NoFields`] if the allow-list is empty.
    /// - [`ExportError::UnknownField`] if the allow-list names a key that is
    ///   not in `available`.
    pub fn export<'a, I>(
        &self,
        records: I,
        available: &[ExportField],
        options: &ExportOptions,
    ) -> Result<ExportArtifact, ExportError>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let fields = select_fields(available, options)?;

        let rows = records
            .into_iter()
            .map(|record| {
                fields
                    .iter()
                    .map(|field| {
                        field.format(
                            record.get(&field.key),
                            options.number_format,
                            options.date_format,
                        )
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let table = Table { fields, rows };
        let exported_at = self.now();
        let metadata = Metadata {
            format: options.format,
            exported_at,
            title: options.title.clone(),
        };

        let body = match options.format {
            ExportFormat::Csv => format::csv::render(&table, options.include_headers),
            ExportFormat::Json => format::json::render(&table, &metadata, options.include_metadata)?,
            ExportFormat::Xml => format::xml::render(&table, &metadata, options.include_metadata),
        };

        let artifact = ExportArtifact {
            filename: filename(options, exported_at),
            mime_type: options.format.mime_type().to_string(),
            record_count: table.rows.len(),
            body,
        };

        info!(
            format = %options.format,
            filename = %artifact.filename,
            records = artifact.record_count,
            fields = table.fields.len(),
            bytes = artifact.body.len(),
            "Export packaged"
        );

        Ok(artifact)
    }
}

fn select_fields<'a>(
    available: &'a [ExportField],
    options: &ExportOptions,
) -> Result<Vec<&'a ExportField>, ExportError> {
    if options.fields.is_empty() {
        return Err(ExportError::NoFields);
    }

    if let Some(unknown) = options
        .fields
        .iter()
        .find(|key| !available.iter().any(|field| field.key == **key))
    {
        return Err(ExportError::UnknownField(unknown.clone()));
    }

    Ok(available
        .iter()
        .filter(|field| options.fields.contains(&field.key))
        .collect())
}

fn filename(options: &ExportOptions, exported_at: DateTime<Utc>) -> String {
    let stem = match &options.filename {
        Some(name) => name.clone(),
        None => format!("export_{}", exported_at.format("%Y%m%d_%H%M%S")),
    };
    format!("{}.{}", stem, options.format.extension())
}

/// A packaged export, ready to download or write to disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: String,
    /// Number of data rows in the body
    pub record_count: usize,
    pub body: String,
}

impl ExportArtifact {
    /// Write the body into `dir`, creating it if needed, and return the file path.
    ///
    /// Characters other than alphanumerics, `-`, `_` and `.` in the filename
    /// are replaced with `_` so a caller-supplied name cannot escape `dir`.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let safe_name: String = self
            .filename
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let safe_name = safe_name.trim_start_matches('.');
        let path = dir.join(if safe_name.is_empty() { "export" } else { safe_name });

        std::fs::write(&path, &self.body).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(?path, bytes = self.body.len(), "Export written");
        Ok(path)
    }
}
