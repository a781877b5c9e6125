//! # SSTable Core
//!
//! Builder and reader for immutable sorted string tables.
//!
//! A table maps unique byte-string keys to byte-string values, each with an
//! optional piece of caller metadata (`extra`). It is written once, in key
//! order, by a [`Builder`] and read many times through a [`Table`].
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │   Builder  /  Table          │  ordering, lookups, floor/ceiling
//! ├──────────────────────────────┤
//! │   ValueReader                │  bounded reads of one value
//! ├──────────────────────────────┤
//! │   sstable_codec              │  header + index wire format
//! ├──────────────────────────────┤
//! │   sstable_storage            │  positioned byte reads
//! └──────────────────────────────┘
//! ```
//!
//! ## Invariants
//!
//! - Keys in a table are unique and strictly ascending (bytewise)
//! - Each entry's offset is the sum of the lengths before it, so values
//!   are contiguous and in key order
//! - The whole index is held in memory; values are read on demand
//! - A loaded table is never mutated and may be shared across threads

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod format;
mod iter;
mod stats;
mod table;
mod value_reader;

pub use builder::Builder;
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use format::{
    DataRegion, FileOffset, ValueOffset, FORMAT_VERSION, HEADER_LEN_FIELD_SIZE, MAX_KEY_LEN,
    MAX_VALUE_LEN,
};
pub use iter::{KeyInfo, KeyIter};
pub use stats::{BuildInfo, TableStats};
pub use table::Table;
pub use value_reader::ValueReader;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
