//! Error types for the tabmend library.

use std::io;
use thiserror::Error;

/// Result type alias for tabmend operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconciling a document.
///
/// Per-row and per-cell anomalies (rejected fragments, unparseable numeric
/// cells, missing metadata) are absorbed as nulls and never surface here;
/// only configuration-level inconsistencies and real I/O failures do.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The canonical schema is inconsistent with the data or with itself.
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    /// The layout configuration cannot be used to build a pipeline.
    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),

    /// A captured document could not be decoded.
    #[error("capture error: {0}")]
    Capture(String),

    /// Error serializing the output table.
    #[error("rendering error: {0}")]
    Render(String),

    /// Error delivering the output table to a sink.
    #[error("sink error: {0}")]
    Sink(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Capture(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Render(err.to_string())
    }
}
