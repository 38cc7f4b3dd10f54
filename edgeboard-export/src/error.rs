use smol_str::SmolStr;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while packaging an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no fields selected for export")]
    NoFields,

    #[error("field {0} is not in the export catalogue")]
    UnknownField(SmolStr),

    #[error("failed to serialise export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write export to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
