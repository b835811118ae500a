//! Error types for persistence and scheduling

use thiserror::Error;

/// Errors raised by key-value stores and the cart store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Permission denied accessing the backing file
    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    /// General I/O error
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Stored value could not be encoded or decoded
    #[error("Serialization error for '{key}': {message}")]
    Serialization { key: String, message: String },

    /// Stored value was written by a newer schema
    #[error("Unsupported schema version {found} for '{key}' (supported up to {supported})")]
    UnsupportedVersion {
        key: String,
        found: u32,
        supported: u32,
    },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io {
            message: err.to_string(),
        }
    }
}

/// Errors raised by periodic tasks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Task has already stopped")]
    AlreadyStopped,

    #[error("Task failed: {message}")]
    Join { message: String },
}

impl From<tokio::task::JoinError> for SchedulerError {
    fn from(err: tokio::task::JoinError) -> Self {
        SchedulerError::Join {
            message: err.to_string(),
        }
    }
}
