//! Error taxonomy for the snapshot pipeline.
//!
//! Every per-indicator failure mode is represented here so the assembler can
//! catch, log, and skip without aborting the run. `Io` and `Json` only occur
//! during setup or while writing the final document, where propagation to the
//! caller is the intended behavior.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapError {
    /// Network failure, timeout, or non-2xx response from a provider.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// A provider document did not have the shape we rely on.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A non-null cell could not be read as a number.
    #[error("could not parse '{value}' in column '{column}' as a number")]
    ValueConversion { column: String, value: String },

    /// No observations survived filtering and null-dropping.
    #[error("no observations survived filtering")]
    EmptySeries,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SnapError {
    fn from(err: reqwest::Error) -> Self {
        SnapError::Fetch(err.to_string())
    }
}
