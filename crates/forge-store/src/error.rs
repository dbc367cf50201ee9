//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

use forge_model::RecordId;

/// Storage operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O error.
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored record could not be parsed.
    #[error("corrupt record file {path}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized.
    #[error("failed to serialize record {id}")]
    Serialization {
        id: RecordId,
        #[source]
        source: serde_json::Error,
    },

    /// `create` was called with an id that is already stored.
    #[error("record {0} already exists")]
    AlreadyExists(RecordId),

    /// `update` was called with an id that is not stored.
    #[error("record {0} does not exist")]
    UnknownRecord(RecordId),

    /// The id cannot be used as a storage key.
    #[error("record id {0} contains characters that cannot be stored")]
    InvalidId(RecordId),
}

pub type Result<T> = std::result::Result<T, StoreError>;
