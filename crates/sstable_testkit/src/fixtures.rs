//! Test fixtures and table helpers.
//!
//! Provides convenience functions for building tables from plain entry
//! lists, in memory or in a temporary file.

use sstable_core::{Builder, Config, Table};
use sstable_storage::{FileSink, FileSource, InMemorySource};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One table entry with owned key, value and extra.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEntry {
    /// Entry key.
    pub key: Vec<u8>,
    /// Value bytes.
    pub value: Vec<u8>,
    /// Caller metadata.
    pub extra: Vec<u8>,
}

impl TestEntry {
    /// Creates an entry.
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>, extra: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            extra: extra.into(),
        }
    }

    /// Returns the value length as stored in the index.
    pub fn length(&self) -> u32 {
        self.value.len() as u32
    }
}

/// Total value bytes of [`standard_entries`].
pub const STANDARD_DATA_SIZE: u64 = 39;

/// The reference entry set: shared prefixes, an empty value, an entry with
/// extra, a maximum-length key and a last key that sorts after the rest.
pub fn standard_entries() -> Vec<TestEntry> {
    vec![
        TestEntry::new("foo", "bar1", ""),
        TestEntry::new("foo1", "bar2", ""),
        TestEntry::new("foo2", "bar3", ""),
        TestEntry::new("foo3", "", ""),
        TestEntry::new("goo", "bar4", ""),
        TestEntry::new("goo1", "bar5", ""),
        TestEntry::new("h".repeat(256), "bar6", ""),
        TestEntry::new("hoo", "randomstuff", vec![1, 2, 3, 4, 5]),
        TestEntry::new("zzz", "last", ""),
    ]
}

/// Returns a value writer serving the values of `entries`, which must be
/// sorted by key.
///
/// A request for a key not in `entries` fails with `NotFound`.
pub fn value_writer(
    entries: &[TestEntry],
) -> impl FnMut(&[u8], &mut dyn Write) -> io::Result<u64> + '_ {
    move |key: &[u8], dest: &mut dyn Write| -> io::Result<u64> {
        let i = entries
            .binary_search_by(|e| e.key.as_slice().cmp(key))
            .map_err(|_| io::Error::new(io::ErrorKind::NotFound, "no value for key"))?;
        dest.write_all(&entries[i].value)?;
        Ok(entries[i].value.len() as u64)
    }
}

/// Builds `entries` into table bytes with the default configuration.
pub fn build_table(entries: &[TestEntry]) -> Vec<u8> {
    build_table_with_config(entries, Config::default())
}

/// Builds `entries` into table bytes.
pub fn build_table_with_config(entries: &[TestEntry], config: Config) -> Vec<u8> {
    let mut out = Vec::new();
    let mut builder = Builder::with_config(&mut out, value_writer(entries), config);
    for entry in entries {
        builder.add(&entry.key, entry.length(), &entry.extra);
    }
    builder.build().expect("Failed to build table");
    out
}

/// Builds and loads `entries` as an in-memory table.
pub fn memory_table(entries: &[TestEntry]) -> Table<InMemorySource> {
    Table::load(InMemorySource::new(build_table(entries))).expect("Failed to load table")
}

/// A table file in a temporary directory, removed on drop.
pub struct TempTable {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl TempTable {
    /// Builds `entries` into a new temporary file.
    pub fn create(entries: &[TestEntry]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("table.sst");

        let mut sink = FileSink::create(&path).expect("Failed to create table file");
        let mut builder = Builder::new(&mut sink, value_writer(entries));
        for entry in entries {
            builder.add(&entry.key, entry.length(), &entry.extra);
        }
        builder.build().expect("Failed to build table");
        sink.sync().expect("Failed to sync table file");

        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file length.
    pub fn len(&self) -> u64 {
        std::fs::metadata(&self.path)
            .expect("Failed to stat table file")
            .len()
    }

    /// Returns true if the file is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cuts the file down to `len` bytes.
    pub fn truncate(&self, len: u64) {
        let file = std::fs::OpenOptions::new()
            .write(true)
            .open(&self.path)
            .expect("Failed to open table file");
        file.set_len(len).expect("Failed to truncate table file");
    }

    /// Opens the file as a source.
    pub fn source(&self) -> FileSource {
        FileSource::open(&self.path).expect("Failed to open table file")
    }

    /// Opens and loads the table.
    pub fn open(&self) -> Table<FileSource> {
        Table::load(self.source()).expect("Failed to load table")
    }
}

/// Runs a test against a temporary file-backed table.
pub fn with_temp_table<F, R>(entries: &[TestEntry], f: F) -> R
where
    F: FnOnce(&Table<FileSource>) -> R,
{
    let temp = TempTable::create(entries);
    let table = temp.open();
    let result = f(&table);
    table.close().expect("Failed to close table");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_entries_are_sorted_and_sized() {
        let entries = standard_entries();
        assert!(entries.windows(2).all(|w| w[0].key < w[1].key));
        let total: u64 = entries.iter().map(|e| e.value.len() as u64).sum();
        assert_eq!(total, STANDARD_DATA_SIZE);
        assert_eq!(entries[6].key.len(), 256);
    }

    #[test]
    fn value_writer_rejects_unknown_keys() {
        let entries = standard_entries();
        let mut writer = value_writer(&entries);
        let mut out = Vec::new();
        assert_eq!(writer(b"hoo", &mut out).unwrap(), 11);
        assert_eq!(out, b"randomstuff");
        let err = writer(b"nope", &mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn temp_table_round_trips() {
        let entries = standard_entries();
        let temp = TempTable::create(&entries);
        assert_eq!(temp.len(), build_table(&entries).len() as u64);

        let value = with_temp_table(&entries, |table| table.get(b"zzz").unwrap().0);
        assert_eq!(value, b"last");
    }
}
