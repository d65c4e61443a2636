//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The key contains characters that cannot be mapped to a file name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Another process holds the data directory lock.
    #[error("data directory locked: another process has exclusive access")]
    Locked,

    /// The data path exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),
}
