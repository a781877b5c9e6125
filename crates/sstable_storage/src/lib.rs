//! # SSTable Storage
//!
//! Byte storage collaborators for the sstable format.
//!
//! Tables are read through a [`RandomAccessSource`]: a handle that serves
//! positioned reads of arbitrary byte ranges and can be closed. Sources are
//! **opaque byte stores** - they know nothing about headers, indexes or
//! values. Tables are written through any [`std::io::Write`]; [`FileSink`]
//! is the file-backed one.
//!
//! ## Design Principles
//!
//! - Reads are positioned and never move shared cursor state
//! - A read that runs into the end of the source returns a short count,
//!   it is not an error at this layer
//! - Sources must be `Send + Sync` so one loaded table can serve many threads
//!
//! ## Available Sources
//!
//! - [`InMemorySource`] - For tests and tables already resident in memory
//! - [`FileSource`] - Positioned reads against an OS file
//!
//! ## Example
//!
//! ```rust
//! use sstable_storage::{InMemorySource, RandomAccessSource};
//!
//! let source = InMemorySource::new(b"hello world".to_vec());
//! let mut buf = [0u8; 5];
//! let n = source.read_at(&mut buf, 6).unwrap();
//! assert_eq!(&buf[..n], b"world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod source;

pub use error::{StorageError, StorageResult};
pub use file::{FileSink, FileSource};
pub use memory::InMemorySource;
pub use source::RandomAccessSource;
