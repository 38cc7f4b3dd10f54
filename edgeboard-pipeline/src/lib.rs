//! Filter / sort / aggregate pipeline for dashboard widgets.
//!
//! Every dashboard widget (arbitrage scanner, SHAP browser, auto-pilot rule list,
//! model grid) runs the same pipeline over a snapshot of flat records:
//!
//! ```text
//! records ─▶ filter (criteria AND search) ─▶ stable sort ─▶ summary + facets ─▶ page
//! ```
//!
//! # Key Components
//!
//! - [`Record`]: a flat map of field name to [`FieldValue`] with an opaque id
//! - [`Criteria`]: per-field [`FieldConstraint`]s (closed bounds, set membership)
//! - [`SortKey`]: single-field stable ordering
//! - [`Summary`]: `{count, sum, max}` over the filtered set, zero when empty
//! - [`Query`]: the whole pipeline, returning a [`QueryOutput`]
//!
//! # Example
//!
//! ```rust
//! use edgeboard_pipeline::{FieldConstraint, Query, Record, SortKey};
//!
//! let records = vec![
//!     Record::new("a").with("roi", 1.0),
//!     Record::new("b").with("roi", 2.0),
//!     Record::new("c").with("roi", 3.0),
//! ];
//!
//! let output = Query::new()
//!     .filter("roi", FieldConstraint::at_least(2.0))
//!     .sort_by(SortKey::ascending("roi"))
//!     .summarize("roi")
//!     .run(&records);
//!
//! assert_eq!(output.ids(), vec!["b", "c"]);
//! assert_eq!((output.summary.count, output.summary.sum, output.summary.max), (2, 5.0, 3.0));
//! ```
//!
//! # Resilience
//!
//! The pipeline is total. A record that lacks a constrained field, or holds a
//! non-numeric value where a bound is tested, is excluded rather than reported.

pub mod aggregate;
pub mod criteria;
pub mod error;
pub mod page;
pub mod query;
pub mod record;
pub mod sort;
pub mod suggest;
pub mod value;

// Re-exports for convenience
pub use aggregate::{Facet, FacetCount, FieldStatistics, Summary, facet, field_statistics, summarize};
pub use criteria::{Criteria, FieldConstraint, TextSearch};
pub use error::PipelineError;
pub use page::{Page, PageRequest};
pub use query::{Query, QueryOutput, filter};
pub use record::Record;
pub use sort::{SortDirection, SortKey, sort};
pub use suggest::suggest_completions;
pub use value::FieldValue;
