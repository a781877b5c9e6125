//! Bounded reader over a single value.

use crate::error::{CoreError, CoreResult};
use crate::format::FileOffset;
use sstable_storage::{RandomAccessSource, StorageError};
use std::io::{self, Read, Seek, SeekFrom};

/// Reads one value's bytes without loading the whole value.
///
/// All offsets are relative to the start of the value; reads never see
/// bytes of neighboring values. [`read_at`](Self::read_at) takes `&self`
/// and may be called from several threads at once. The [`Read`] and
/// [`Seek`] impls keep a cursor and need `&mut self`.
#[derive(Debug)]
pub struct ValueReader<'a, S: RandomAccessSource> {
    source: &'a S,
    start: FileOffset,
    length: u64,
    pos: u64,
}

impl<'a, S: RandomAccessSource> ValueReader<'a, S> {
    pub(crate) fn new(source: &'a S, start: FileOffset, length: u32) -> Self {
        Self {
            source,
            start,
            length: u64::from(length),
            pos: 0,
        }
    }

    /// Returns the value's length.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.length
    }

    /// Returns true for a zero-length value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Reads up to `buf.len()` bytes starting `offset` bytes into the value.
    ///
    /// Returns `Ok(0)` at or past the end of the value. Otherwise the read
    /// is clamped to the value and either fills the clamped range or fails.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnexpectedEof`] if the source ends inside the
    /// clamped range; the bytes that were available are left in `buf`.
    /// Storage errors are propagated.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> CoreResult<usize> {
        if offset >= self.length {
            return Ok(0);
        }
        let want = (self.length - offset).min(buf.len() as u64) as usize;
        // The table only hands out readers whose whole range fits in a u64.
        let at = FileOffset::new(self.start.as_u64() + offset);

        let read = self.source.read_full_at(&mut buf[..want], at.as_u64())?;
        if read < want {
            return Err(CoreError::UnexpectedEof {
                offset: at.as_u64(),
                expected: want,
                read,
            });
        }
        Ok(want)
    }
}

impl<S: RandomAccessSource> Read for ValueReader<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.read_at(buf, self.pos) {
            Ok(n) => {
                self.pos += n as u64;
                Ok(n)
            }
            Err(CoreError::Storage(StorageError::Io(e))) => Err(e),
            Err(e @ CoreError::UnexpectedEof { .. }) => {
                Err(io::Error::new(io::ErrorKind::UnexpectedEof, e))
            }
            Err(e) => Err(io::Error::other(e)),
        }
    }
}

impl<S: RandomAccessSource> Seek for ValueReader<'_, S> {
    /// Seeking past the end is allowed; reads there return 0 bytes.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::End(delta) => self.length.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta),
        };
        match target {
            Some(n) => {
                self.pos = n;
                Ok(n)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek to a negative or overflowing position",
            )),
        }
    }
}
