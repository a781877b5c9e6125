//! File layout constants and offset types.
//!
//! ```text
//! [4 bytes: little-endian u32 header length]
//! [header length bytes: TableHeader]
//! [index_length bytes: varint-framed IndexEntry records]
//! [value region: values concatenated in entry order]
//! ```
//!
//! Index entries record offsets relative to the value region
//! ([`ValueOffset`]); reads against the source use absolute positions
//! ([`FileOffset`]). [`DataRegion`] is the only translation between them.

use std::fmt;

/// The only table format version this crate reads and writes.
pub const FORMAT_VERSION: u32 = 1;

/// Size of the little-endian header length field at offset 0.
pub const HEADER_LEN_FIELD_SIZE: u64 = 4;

/// Longest key the builder accepts.
pub const MAX_KEY_LEN: usize = 256;

/// Largest value length the builder accepts (1 GiB).
pub const MAX_VALUE_LEN: u32 = 1 << 30;

/// Position within the value region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueOffset(u64);

impl ValueOffset {
    /// Creates a value-region offset.
    #[must_use]
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    /// Returns the raw offset.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ValueOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value+{}", self.0)
    }
}

/// Absolute position within the table file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileOffset(u64);

impl FileOffset {
    /// Creates a file offset.
    #[must_use]
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    /// Returns the raw offset.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns this offset advanced by `delta` bytes, or `None` if the
    /// result does not fit in a `u64`.
    #[must_use]
    pub const fn checked_add(self, delta: u64) -> Option<Self> {
        match self.0.checked_add(delta) {
            Some(offset) => Some(Self(offset)),
            None => None,
        }
    }
}

impl fmt::Display for FileOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file+{}", self.0)
    }
}

/// Where the value region starts in a particular file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRegion {
    start: FileOffset,
}

impl DataRegion {
    /// Locates the value region from the encoded header and index lengths.
    #[must_use]
    pub const fn new(header_len: u32, index_len: u32) -> Self {
        Self {
            start: FileOffset(HEADER_LEN_FIELD_SIZE + header_len as u64 + index_len as u64),
        }
    }

    /// Returns the absolute offset of the first value byte.
    #[must_use]
    pub const fn start(self) -> FileOffset {
        self.start
    }

    /// Translates a value-region offset to an absolute file offset.
    ///
    /// Returns `None` when the position lies beyond `u64::MAX`, which only
    /// a corrupt index can produce.
    #[must_use]
    pub const fn absolute(self, offset: ValueOffset) -> Option<FileOffset> {
        self.start.checked_add(offset.0)
    }
}
