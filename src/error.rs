//! Error types for dataset ingestion
//!
//! The analysis core never fails; only turning outside content into a
//! [`Dataset`](crate::data::Dataset) can.

use thiserror::Error;

/// Errors that can occur while turning content into a dataset
#[derive(Error, Debug)]
pub enum IngestError {
    /// IO error while reading input
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// No JSON value could be located in raw content
    #[error("No JSON data found in content")]
    NoJson,

    /// JSON was found but is not an object or an array of objects
    #[error("Input data must be a JSON object or an array of objects, found {found}")]
    NotTabular { found: &'static str },

    /// A field holds an array or object, which is not a scalar
    #[error("Unsupported value type for field '{field}'")]
    UnsupportedValue { field: String },

    /// A selection produced no rows at all
    #[error("Nothing to visualize from selection")]
    NothingToVisualize,
}

/// Result type alias for ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;
