use serde::Serialize;
use thiserror::Error;

/// Fatal errors. Any of these aborts the run before a single candidate is
/// classified.
#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error (empty marker, bad delimiter, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),

    /// Region polygon cannot be built from the configured vertices.
    #[error("malformed region '{region}': {reason}")]
    MalformedRegionConfig { region: String, reason: String },
}

/// Which coordinate column failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateField {
    Latitude,
    Longitude,
}

impl std::fmt::Display for CoordinateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latitude => write!(f, "latitude"),
            Self::Longitude => write!(f, "longitude"),
        }
    }
}

/// Why a candidate row was left out of the output.
///
/// Data-quality outcomes, not errors: the engine records them and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropReason {
    #[error("empty identifier")]
    EmptyIdentifier,

    #[error("unparseable {field} '{value}'")]
    UnparseableCoordinate { field: CoordinateField, value: String },

    #[error("outside region")]
    OutOfRegion,
}
