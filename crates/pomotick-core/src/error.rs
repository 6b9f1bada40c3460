//! Core error types for pomotick-core.
//!
//! Nothing in the timer is fatal. These types exist so the storage and
//! sound-cue seams can report what went wrong; the engine logs them and
//! carries on with its in-memory state.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomotick-core.
///
/// Raised by settings edits. Storage and cue failures keep their own types
/// because the engine logs them instead of returning them.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid settings key or value
    #[error("Invalid setting '{key}': {message}")]
    InvalidSetting { key: String, message: String },

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable key-value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Could not prepare the storage directory
    #[error("Storage directory {path} unavailable: {source}")]
    DirUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a key failed
    #[error("Failed to write '{key}': {source}")]
    WriteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The store refused the write (quota, disabled storage)
    #[error("Store rejected write for '{key}': {message}")]
    Rejected { key: String, message: String },
}

/// Errors raised by a sound-cue adapter.
#[derive(Error, Debug)]
pub enum CueError {
    /// Audio is not available in this environment
    #[error("Audio unavailable: {0}")]
    Unavailable(String),

    /// Writing the cue to its output failed
    #[error("Cue output failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
