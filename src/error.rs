//! Error types for geomdb operations.

use crate::types::PayloadMode;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GeomDbError>;

/// Errors surfaced by index construction, persistence, and queries.
#[derive(Debug, Error)]
pub enum GeomDbError {
    /// The configured time field is not part of the source attribute schema.
    #[error("time field '{0}' not present in source attribute schema")]
    MissingTimeField(String),

    /// A persisted index was built with a different dimensionality than the
    /// one requested.
    #[error("persisted index is {found}-dimensional, expected {expected}")]
    DimensionMismatch { expected: u8, found: u8 },

    /// A persisted index was built with a different payload mode than the
    /// one requested.
    #[error("persisted index stores {found:?} payloads, expected {expected:?}")]
    PayloadModeMismatch {
        expected: PayloadMode,
        found: PayloadMode,
    },

    /// The source has no record for the given id. When the id came from the
    /// index, this signals a stale persisted index referencing records no
    /// longer present in the source.
    #[error("source has no record for id {0}")]
    MissingRecord(usize),

    /// A record exists but lacks the requested attribute.
    #[error("record {id} has no attribute '{field}'")]
    MissingAttribute { id: usize, field: String },

    /// A geometry has no defined bounding box (empty geometry).
    #[error("geometry {0} has no bounding box")]
    EmptyGeometry(usize),

    /// A query box violated the `min <= max` contract or contained
    /// non-finite coordinates.
    #[error("invalid query box: {0}")]
    InvalidQuery(String),

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A persisted artifact did not carry the expected magic bytes or
    /// format version.
    #[error("index file format not recognized")]
    InvalidFormat,

    /// Encoding or decoding a persisted artifact failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Underlying file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
