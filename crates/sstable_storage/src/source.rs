//! Random-access source trait definition.

use crate::error::{StorageError, StorageResult};

/// A positioned-read byte source that a table is loaded from.
///
/// # Invariants
///
/// - `read_at` never changes what a later `read_at` observes
/// - `read_at` returns fewer bytes than requested only when the read
///   reaches the end of the source; `Ok(0)` means `offset` is at or past it
/// - Sources must be `Send + Sync` for concurrent reads
///
/// Escalating a short read inside a range the caller *expected* to exist is
/// the caller's job; this layer only reports how many bytes were there.
///
/// # Implementors
///
/// - [`super::InMemorySource`]
/// - [`super::FileSource`]
pub trait RandomAccessSource: Send + Sync {
    /// Reads up to `buf.len()` bytes starting at absolute `offset`.
    ///
    /// Returns the number of bytes copied into `buf`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is closed or an I/O error occurs.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> StorageResult<usize>;

    /// Returns the current size of the source in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;

    /// Releases the underlying handle.
    ///
    /// Reads after a successful close fail. The default does nothing, which
    /// suits sources with no external handle.
    ///
    /// # Errors
    ///
    /// Returns an error if releasing the handle fails.
    fn close(&mut self) -> StorageResult<()> {
        Ok(())
    }

    /// Fills as much of `buf` as the source holds, retrying short reads.
    ///
    /// Returns the number of bytes read, which is less than `buf.len()` only
    /// when the end of the source was reached.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`read_at`](Self::read_at).
    fn read_full_at(&self, buf: &mut [u8], offset: u64) -> StorageResult<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            // Nothing is addressable past u64::MAX.
            let Some(at) = offset.checked_add(filled as u64) else {
                break;
            };
            let n = self.read_at(&mut buf[filled..], at)?;
            if n == 0 {
                break;
            }
            if n > buf.len() - filled {
                return Err(StorageError::Corrupted(format!(
                    "read_at returned {} bytes for a {} byte buffer",
                    n,
                    buf.len() - filled
                )));
            }
            filled += n;
        }
        Ok(filled)
    }
}
