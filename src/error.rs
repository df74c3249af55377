//! Library error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::vocabulary::DataType;

/// Errors raised by the vocabulary, metadata and output layers.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The raw vocabulary could not be read, parsed, or was empty.
    #[error("vocabulary unavailable: {0}")]
    VocabularyUnavailable(String),

    /// A record references a content type the store does not know.
    #[error("unknown content type `{0}`")]
    UnknownContentType(String),

    #[error("invalid validation pattern for {data_type}")]
    InvalidPattern {
        data_type: DataType,
        #[source]
        source: regex::Error,
    },

    #[error("vocabulary cache error at `{path}`")]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot breaks the store invariants (ranges, property links).
    #[error("inconsistent vocabulary snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("vocabulary snapshot serialization failed")]
    Snapshot(#[from] serde_json::Error),

    #[error("html transform failed: {0}")]
    Html(String),
}

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;
