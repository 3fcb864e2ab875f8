//! Metadata shape error types.

use thiserror::Error;

/// Metadata did not have the shape the resolver needs.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum MetadataError {
    #[error("metadata must be a JSON object")]
    NotAnObject,

    #[error("metadata is missing the `{path}` object")]
    MissingSlot { path: &'static str },

    #[error("`{path}` must be an object with an optional `url` string")]
    InvalidSlot { path: &'static str },

    #[error("malformed metadata: {0}")]
    Malformed(#[from] serde_json::Error),
}
