//! Error types for table building and reading.

use bytes::Bytes;
use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while building or reading a table.
///
/// Three families matter to callers: a routine miss ([`is_not_found`]),
/// a corrupt or foreign file ([`is_corruption`]), and a failure of the
/// underlying storage that may succeed on retry ([`is_io`]).
///
/// [`is_not_found`]: CoreError::is_not_found
/// [`is_corruption`]: CoreError::is_corruption
/// [`is_io`]: CoreError::is_io
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage source error.
    #[error("storage error: {0}")]
    Storage(#[from] sstable_storage::StorageError),

    /// Header or index decoding error.
    #[error("codec error: {0}")]
    Codec(#[from] sstable_codec::CodecError),

    /// I/O error from a sink or value writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The key is not in the table.
    #[error("key not found: {key:?}")]
    NotFound {
        /// The key that was looked up.
        key: Bytes,
    },

    /// The header names a format version this reader does not support.
    #[error("unsupported table version {version}")]
    UnsupportedVersion {
        /// Version found in the header.
        version: u32,
    },

    /// The file's layout is inconsistent.
    #[error("invalid table format: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },

    /// Index keys are not strictly increasing.
    #[error("unexpected sort order at entry {index}: {previous:?} >= {next:?}")]
    OutOfOrder {
        /// Position of the second key of the offending pair.
        index: usize,
        /// The earlier key.
        previous: Bytes,
        /// The later key, which is not greater than `previous`.
        next: Bytes,
    },

    /// The source ended inside a value the index says exists.
    #[error("unexpected end of data at offset {offset}: expected {expected} bytes, read {read}")]
    UnexpectedEof {
        /// Absolute file offset the read started at.
        offset: u64,
        /// Bytes the read needed.
        expected: usize,
        /// Bytes actually available; they are in the caller's buffer.
        read: usize,
    },

    /// A partial read asked for bytes beyond the value's length.
    #[error("read of {len} bytes at offset {offset} exceeds value length {length}")]
    OutOfRange {
        /// Offset within the value.
        offset: u64,
        /// Requested byte count.
        len: usize,
        /// Length of the value.
        length: u32,
    },

    /// An entry passed to the builder breaks the table's invariants.
    #[error("invalid entry: {message}")]
    InvalidEntry {
        /// Description of the violation.
        message: String,
    },

    /// Operation not permitted in current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why operation is invalid.
        message: String,
    },
}

impl CoreError {
    /// Creates a not found error.
    pub fn not_found(key: &[u8]) -> Self {
        Self::NotFound {
            key: Bytes::copy_from_slice(key),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Creates an invalid entry error.
    pub fn invalid_entry(message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Returns true for a lookup of a key the table does not hold.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true when the table file itself is malformed or truncated.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::Codec(_)
                | Self::UnsupportedVersion { .. }
                | Self::InvalidFormat { .. }
                | Self::OutOfOrder { .. }
                | Self::UnexpectedEof { .. }
                | Self::Storage(sstable_storage::StorageError::Corrupted(_))
        )
    }

    /// Returns true for failures of the underlying storage.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::Storage(
                    sstable_storage::StorageError::Io(_) | sstable_storage::StorageError::Closed
                )
        )
    }
}
