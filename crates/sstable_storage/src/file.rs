//! File-based source and sink.

use crate::error::{StorageError, StorageResult};
use crate::source::RandomAccessSource;
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A random-access source reading from an OS file.
///
/// Reads are positioned (`pread` on Unix, `seek_read` on Windows), so many
/// threads can read concurrently under a shared lock. The lock is only taken
/// exclusively by [`close`](RandomAccessSource::close).
///
/// # Example
///
/// ```no_run
/// use sstable_storage::{FileSource, RandomAccessSource};
/// use std::path::Path;
///
/// let source = FileSource::open(Path::new("table.sst")).unwrap();
/// let mut header_len = [0u8; 4];
/// source.read_at(&mut header_len, 0).unwrap();
/// ```
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    file: RwLock<Option<File>>,
    size: u64,
}

impl FileSource {
    /// Opens an existing file for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its size read.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            file: RwLock::new(Some(file)),
            size,
        })
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true once [`close`](RandomAccessSource::close) has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.file.read().is_none()
    }
}

#[cfg(unix)]
fn pread(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    std::os::unix::fs::FileExt::read_at(file, buf, offset)
}

#[cfg(windows)]
fn pread(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    std::os::windows::fs::FileExt::seek_read(file, buf, offset)
}

impl RandomAccessSource for FileSource {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> StorageResult<usize> {
        let guard = self.file.read();
        let file = guard.as_ref().ok_or(StorageError::Closed)?;

        let mut filled = 0;
        while filled < buf.len() {
            match pread(file, &mut buf[filled..], offset + filled as u64) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    fn size(&self) -> StorageResult<u64> {
        if self.is_closed() {
            return Err(StorageError::Closed);
        }
        Ok(self.size)
    }

    fn close(&mut self) -> StorageResult<()> {
        self.file.write().take();
        Ok(())
    }
}

/// A sequential file sink for writing a table.
///
/// The file is created (or truncated) on open. Call [`sync`](Self::sync)
/// after the table is built to make it durable.
///
/// # Example
///
/// ```no_run
/// use sstable_storage::FileSink;
/// use std::io::Write;
/// use std::path::Path;
///
/// let mut sink = FileSink::create(Path::new("table.sst")).unwrap();
/// sink.write_all(b"bytes").unwrap();
/// sink.sync().unwrap();
/// ```
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: File,
    written: u64,
}

impl FileSink {
    /// Creates the file at `path`, truncating any existing content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            written: 0,
        })
    }

    /// Creates the file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot
    /// be created.
    pub fn create_with_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::create(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flushes and syncs data and metadata to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync fails.
    pub fn sync(&mut self) -> StorageResult<()> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
