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

    /// The source has been closed.
    #[error("storage is closed")]
    Closed,

    /// The source reported an impossible state, such as a read count larger
    /// than the destination buffer.
    #[error("storage corrupted: {0}")]
    Corrupted(String),
}
