use smol_str::SmolStr;
use thiserror::Error;

/// Errors raised while validating or decoding pipeline configuration.
///
/// Running a [`Query`](crate::Query) never fails; these only surface when a
/// query or criteria object is loaded.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("empty range for field {field}: lower bound {min}, upper bound {max}")]
    InvalidBounds { field: SmolStr, min: f64, max: f64 },

    #[error("bound for field {0} is not a number")]
    NanBound(SmolStr),

    #[error("empty field name in {0}")]
    EmptyField(&'static str),

    #[error("page limit must be greater than zero")]
    ZeroLimit,

    #[error("failed to decode query: {0}")]
    Decode(#[from] serde_json::Error),
}
