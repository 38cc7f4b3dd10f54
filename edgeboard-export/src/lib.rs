//! Export packaging for dashboard records.
//!
//! Takes the ordered output of the filter pipeline plus a field allow-list and
//! renders a downloadable CSV, JSON or XML body.
//!
//! # Key Components
//!
//! - [`ExportField`]: a catalogue entry (`key`, column `label`, [`FieldKind`])
//! - [`ExportOptions`]: format, allow-list, header/metadata switches, number
//!   and date formats, optional filename and title
//! - [`Exporter`]: selects, formats and renders, returning an [`ExportArtifact`]
//!
//! # Example
//!
//! ```rust
//! use edgeboard_export::{ExportField, ExportFormat, ExportOptions, Exporter};
//! use edgeboard_pipeline::Record;
//!
//! let records = vec![Record::new("a").with("sport", "MLB").with("roi", 2.5)];
//! let available = vec![
//!     ExportField::text("sport", "Sport"),
//!     ExportField::number("roi", "ROI %"),
//! ];
//! let options = ExportOptions::new(ExportFormat::Csv, ["sport", "roi"]);
//!
//! let artifact = Exporter::new().export(&records, &available, &options).unwrap();
//! assert_eq!(artifact.body, "Sport,ROI %\r\nMLB,2.50\r\n");
//! ```

pub mod error;
pub mod exporter;
pub mod field;
pub mod format;
pub mod options;

// Re-exports for convenience
pub use error::ExportError;
pub use exporter::{ExportArtifact, Exporter};
pub use field::{ExportField, FieldKind};
pub use options::{DateFormat, ExportFormat, ExportOptions, NumberFormat};
