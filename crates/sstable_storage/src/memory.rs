//! In-memory random-access source.

use crate::error::StorageResult;
use crate::source::RandomAccessSource;
use bytes::Bytes;

/// A random-access source over an immutable in-memory buffer.
///
/// This source is suitable for:
/// - Unit and integration tests
/// - Tables fetched whole from a remote store
///
/// Cloning is cheap: clones share the same buffer.
///
/// # Example
///
/// ```rust
/// use sstable_storage::{InMemorySource, RandomAccessSource};
///
/// let source = InMemorySource::new(b"test data".to_vec());
/// assert_eq!(source.size().unwrap(), 9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    data: Bytes,
}

impl InMemorySource {
    /// Creates a source over the given bytes.
    #[must_use]
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Returns the bytes backing this source.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

impl From<Vec<u8>> for InMemorySource {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl RandomAccessSource for InMemorySource {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> StorageResult<usize> {
        let size = self.data.len() as u64;
        if offset >= size {
            return Ok(0);
        }

        let start = offset as usize;
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.len() as u64)
    }
}
