//! Error types for board operations
//!
//! Provides unified error handling for decoding, persistence, fetching and
//! export. Failures local to a single item are reported through these types
//! and collected by batch operations rather than aborting the batch.

use crate::types::ItemId;
use thiserror::Error;

/// Errors that can occur during board operations
#[derive(Error, Debug)]
pub enum BoardError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode or encode error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Embedded image bytes were not valid base64
    #[error("invalid image payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Project container written by an unknown version
    #[error("unsupported project version: {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Bytes did not look like any known raster format
    #[error("unrecognized image format: {0}")]
    UnknownFormat(String),

    /// The fetch collaborator failed to produce bytes
    #[error("fetch failed for {source_name}: {error}")]
    Fetch {
        source_name: String,
        #[source]
        error: anyhow::Error,
    },

    /// An item id was not present in the scene
    #[error("no item with id {0}")]
    MissingItem(ItemId),

    /// An item with this id is already in the scene
    #[error("duplicate item id {0}")]
    DuplicateItem(ItemId),

    /// Background work was cancelled before completion
    #[error("operation cancelled")]
    Cancelled,

    /// Generic error message
    #[error("{0}")]
    Other(String),
}

/// Result type alias for board operations
pub type BoardResult<T> = Result<T, BoardError>;

impl From<String> for BoardError {
    fn from(s: String) -> Self {
        BoardError::Other(s)
    }
}

impl From<&str> for BoardError {
    fn from(s: &str) -> Self {
        BoardError::Other(s.to_string())
    }
}

/// A failure attached to one element of a batch.
#[derive(Debug)]
pub struct ItemFailure {
    /// Display label of the failed element (path, url or item name)
    pub label: String,
    pub error: BoardError,
}

impl ItemFailure {
    pub fn new(label: impl Into<String>, error: BoardError) -> Self {
        Self {
            label: label.into(),
            error,
        }
    }
}
