use std::path::PathBuf;

use thiserror::Error;

/// Fatal ingestion/output failures. Per-row problems never surface here;
/// they become drop reasons in the engine.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Map-source export is not valid Overpass JSON.
    #[error("cannot decode map source {}: {message}", path.display())]
    MapDecode { path: PathBuf, message: String },

    /// Structural CSV error (bad quoting, invalid header row).
    #[error("reference CSV error: {0}")]
    Csv(String),

    /// None of the accepted header names is present.
    #[error("reference CSV has no {column} column (tried: {})", tried.join(", "))]
    MissingColumn { column: String, tried: Vec<String> },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
