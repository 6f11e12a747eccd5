//! Storage error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving the history
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization to JSON failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// The stored blob is not a history array
    #[error("Deserialization failed for key '{key}': {message}")]
    DeserializationFailed { key: String, message: String },

    /// A lock guarding the store was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,
}
