//! # SSTable Testkit
//!
//! Test utilities for sstable.
//!
//! This crate provides:
//! - Fixtures that build tables in memory or in temporary files
//! - Property-based test generators using proptest
//! - Golden byte vectors pinning the on-disk format
//!
//! Cross-crate integration tests live in this crate's `tests/` directory.
//!
//! ## Usage
//!
//! ```rust
//! use sstable_testkit::prelude::*;
//!
//! let table = memory_table(&standard_entries());
//! assert_eq!(table.num_keys(), 9);
//! assert_eq!(table.data_size(), STANDARD_DATA_SIZE);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use generators::*;
pub use vectors::*;
