//! Error types for survey normalisation and tiling.

use crate::projection::Crs;
use std::path::PathBuf;

/// Result type alias for the pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a normalisation or tiling run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Raw record carries neither `file_name` nor `ImageName`.
    #[error(
        "record {position}: metadata format not supported, expected a `file_name` (EPSG:2177) or `ImageName` (UTM) record"
    )]
    UnsupportedMetadataFormat { position: usize },

    /// Raw record matched a schema but a field is missing or mistyped.
    #[error("record {position}: {reason}")]
    InvalidRecord { position: usize, reason: String },

    /// No numeric suffix could be parsed from an image file name.
    #[error("cannot derive an index from file name `{0}`")]
    MalformedFileName(String),

    #[error("UTM zone {0} is outside 1..=60")]
    InvalidUtmZone(u8),

    /// Grid definition rejected or a coordinate could not be converted.
    #[error("{crs} projection failed: {reason}")]
    Projection { crs: Crs, reason: String },

    /// Bounding region requested for zero records.
    #[error("cannot compute a region over zero records")]
    EmptyRegion,

    /// Partition requested for zero records.
    #[error("cannot partition an empty record list")]
    EmptyPartitionInput,

    #[error("invalid tiling configuration: {0}")]
    InvalidTilingConfig(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Built tree breaks one of its structural guarantees.
    #[error("tileset invariant violated: {0}")]
    InvariantViolation(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
