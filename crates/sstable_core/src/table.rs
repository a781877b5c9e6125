//! Table reader.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::format::{DataRegion, FileOffset, ValueOffset, FORMAT_VERSION, HEADER_LEN_FIELD_SIZE};
use crate::iter::{KeyInfo, KeyIter};
use crate::stats::TableStats;
use crate::value_reader::ValueReader;
use bytes::Bytes;
use sstable_codec::{Decode, DelimitedFrames, IndexEntry, TableHeader};
use sstable_storage::RandomAccessSource;
use tracing::debug;

/// An immutable table loaded from a random-access source.
///
/// Loading reads the header and the whole index into memory; values stay
/// in the source and are read on demand. Every query takes `&self`, so a
/// table can be shared across threads (for example behind an `Arc`) as
/// long as the source supports concurrent positioned reads.
///
/// # Example
///
/// ```
/// use sstable_core::{Builder, Table};
/// use sstable_storage::InMemorySource;
/// use std::io::{self, Write};
///
/// let mut file = Vec::new();
/// let mut builder = Builder::new(&mut file, |_key: &[u8], dest: &mut dyn Write| -> io::Result<u64> {
///     dest.write_all(b"bar")?;
///     Ok(3)
/// });
/// builder.add(b"foo", 3, b"");
/// builder.build().unwrap();
///
/// let table = Table::load(InMemorySource::new(file)).unwrap();
/// let (value, _extra) = table.get(b"foo").unwrap();
/// assert_eq!(value, b"bar");
/// assert!(table.get(b"baz").unwrap_err().is_not_found());
/// ```
#[derive(Debug)]
pub struct Table<S: RandomAccessSource> {
    source: S,
    region: DataRegion,
    entries: Vec<IndexEntry>,
    stats: TableStats,
}

impl<S: RandomAccessSource> Table<S> {
    /// Loads a table with the default configuration.
    ///
    /// # Errors
    ///
    /// See [`load_with_config`](Self::load_with_config).
    pub fn load(source: S) -> CoreResult<Self> {
        Self::load_with_config(source, &Config::default())
    }

    /// Loads a table, reading its header and index.
    ///
    /// The value region is not read, so a table whose values are
    /// truncated still loads; the damage surfaces when an affected value
    /// is read.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the source fails, or a corruption error
    /// (see [`CoreError::is_corruption`]) if the header or index is
    /// truncated, malformed, unsorted, or of an unsupported version.
    pub fn load_with_config(source: S, config: &Config) -> CoreResult<Self> {
        let file_size = source.size()?;

        let mut len_field = [0u8; HEADER_LEN_FIELD_SIZE as usize];
        read_exact(&source, &mut len_field, FileOffset::new(0))?;
        let header_size = u32::from_le_bytes(len_field);

        let header_bytes = read_section(
            &source,
            file_size,
            FileOffset::new(HEADER_LEN_FIELD_SIZE),
            header_size,
        )?;
        let header = TableHeader::decode(&header_bytes)?;
        if header.version != FORMAT_VERSION {
            return Err(CoreError::UnsupportedVersion {
                version: header.version,
            });
        }

        let region = DataRegion::new(header_size, header.index_length);
        let mut stats = TableStats {
            header_size,
            index_size: header.index_length,
            ..TableStats::default()
        };
        if header.index_length == 0 {
            debug!(header_size, "loaded empty table");
            return Ok(Self {
                source,
                region,
                entries: Vec::new(),
                stats,
            });
        }

        let index = read_section(
            &source,
            file_size,
            FileOffset::new(HEADER_LEN_FIELD_SIZE + u64::from(header_size)),
            header.index_length,
        )?;
        let entries = decode_index(Bytes::from(index), header.index_entries, config, &mut stats)?;

        if header.index_entries == 0 {
            debug!("header carries no entry count");
        }
        debug!(
            entries = entries.len(),
            index_size = stats.index_size,
            data_size = stats.values_size,
            "loaded table"
        );
        Ok(Self {
            source,
            region,
            entries,
            stats,
        })
    }

    fn search(&self, key: &[u8]) -> usize {
        self.entries.partition_point(|e| e.key.as_ref() < key)
    }

    fn find(&self, key: &[u8]) -> Option<&IndexEntry> {
        self.entries
            .get(self.search(key))
            .filter(|e| e.key.as_ref() == key)
    }

    fn entry(&self, key: &[u8]) -> CoreResult<&IndexEntry> {
        self.find(key).ok_or_else(|| CoreError::not_found(key))
    }

    /// Locates `entry`'s value, failing if its range runs past `u64::MAX`.
    fn value_start(&self, entry: &IndexEntry) -> CoreResult<FileOffset> {
        self.region
            .absolute(ValueOffset::new(entry.offset))
            .filter(|start| start.checked_add(u64::from(entry.length)).is_some())
            .ok_or_else(|| {
                CoreError::invalid_format(format!(
                    "value of key \"{}\" at offset {} with length {} overflows the file",
                    entry.key.escape_ascii(),
                    entry.offset,
                    entry.length
                ))
            })
    }

    /// Returns true if the table holds `key`.
    #[must_use]
    pub fn has(&self, key: &[u8]) -> bool {
        self.find(key).is_some()
    }

    /// Reads the value and extra stored for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] for an absent key,
    /// [`CoreError::UnexpectedEof`] if the source ends inside the value, and
    /// [`CoreError::InvalidFormat`] if the entry's range overflows the file.
    pub fn get(&self, key: &[u8]) -> CoreResult<(Vec<u8>, Bytes)> {
        let entry = self.entry(key)?;
        if entry.length == 0 {
            return Ok((Vec::new(), entry.extra.clone()));
        }
        let value = read_section(
            &self.source,
            self.source.size()?,
            self.value_start(entry)?,
            entry.length,
        )?;
        Ok((value, entry.extra.clone()))
    }

    /// Returns the value length and extra for `key` without reading the value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] for an absent key.
    pub fn get_info(&self, key: &[u8]) -> CoreResult<(u32, Bytes)> {
        let entry = self.entry(key)?;
        Ok((entry.length, entry.extra.clone()))
    }

    /// Returns a reader bounded to the value of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] for an absent key and
    /// [`CoreError::InvalidFormat`] if the entry's range overflows the file.
    pub fn get_reader(&self, key: &[u8]) -> CoreResult<ValueReader<'_, S>> {
        let entry = self.entry(key)?;
        Ok(ValueReader::new(
            &self.source,
            self.value_start(entry)?,
            entry.length,
        ))
    }

    /// Fills `dest` with the value bytes of `key` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] for an absent key,
    /// [`CoreError::OutOfRange`] if `offset + dest.len()` exceeds the
    /// value's length, [`CoreError::UnexpectedEof`] if the source ends
    /// inside the requested range, and [`CoreError::InvalidFormat`] if the
    /// entry's range overflows the file.
    pub fn get_partial(&self, key: &[u8], offset: u64, dest: &mut [u8]) -> CoreResult<()> {
        let entry = self.entry(key)?;
        let in_range = offset
            .checked_add(dest.len() as u64)
            .is_some_and(|end| end <= u64::from(entry.length));
        if !in_range {
            return Err(CoreError::OutOfRange {
                offset,
                len: dest.len(),
                length: entry.length,
            });
        }
        if entry.length == 0 || dest.is_empty() {
            return Ok(());
        }
        // `offset` is inside the value, whose end was checked by `value_start`.
        let at = FileOffset::new(self.value_start(entry)?.as_u64() + offset);
        read_exact(&self.source, dest, at)
    }

    /// Returns every key in ascending order.
    ///
    /// The keys share the index buffer; nothing is copied.
    #[must_use]
    pub fn keys(&self) -> Vec<Bytes> {
        self.entries.iter().map(|e| e.key.clone()).collect()
    }

    /// Returns an iterator over the keys in ascending order.
    #[must_use]
    pub fn key_iter(&self) -> KeyIter<'_> {
        KeyIter::new(&self.entries)
    }

    /// Returns the greatest entry whose key is `<= key`.
    #[must_use]
    pub fn lower_key(&self, key: &[u8]) -> Option<KeyInfo> {
        let i = self.search(key);
        let floor = match self.entries.get(i) {
            Some(e) if e.key.as_ref() == key => i,
            _ => i.checked_sub(1)?,
        };
        Some(KeyInfo::from(&self.entries[floor]))
    }

    /// Returns the least entry whose key is `>= key`.
    #[must_use]
    pub fn upper_key(&self, key: &[u8]) -> Option<KeyInfo> {
        self.entries.get(self.search(key)).map(KeyInfo::from)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn num_keys(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the sum of all value lengths.
    #[must_use]
    pub fn data_size(&self) -> u64 {
        self.stats.values_size
    }

    /// Returns the size breakdown gathered at load.
    #[must_use]
    pub fn stats(&self) -> TableStats {
        self.stats
    }

    /// Returns where the value region starts.
    #[must_use]
    pub fn data_region(&self) -> DataRegion {
        self.region
    }

    /// Returns the underlying source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Releases the index and closes the source.
    ///
    /// # Errors
    ///
    /// Returns an error if closing the source fails.
    pub fn close(self) -> CoreResult<()> {
        let Self {
            mut source,
            entries,
            ..
        } = self;
        drop(entries);
        source.close()?;
        debug!("closed table");
        Ok(())
    }
}

/// Decodes, orders and cross-checks every index entry.
fn decode_index(
    index: Bytes,
    expected_count: u32,
    config: &Config,
    stats: &mut TableStats,
) -> CoreResult<Vec<IndexEntry>> {
    // Each frame takes at least one byte, which bounds a corrupt count.
    let capacity = (expected_count as usize).min(index.len());
    let mut entries: Vec<IndexEntry> = Vec::with_capacity(capacity);
    let mut value_pos = 0u64;

    for frame in DelimitedFrames::new(index) {
        let entry = IndexEntry::decode_shared(&frame?)?;

        if let Some(prev) = entries.last() {
            if entry.key <= prev.key {
                return Err(CoreError::OutOfOrder {
                    index: entries.len(),
                    previous: prev.key.clone(),
                    next: entry.key,
                });
            }
        }
        if config.verify_offsets && entry.offset != value_pos {
            return Err(CoreError::invalid_format(format!(
                "entry {} has offset {}, expected {}",
                entries.len(),
                entry.offset,
                value_pos
            )));
        }

        value_pos += u64::from(entry.length);
        stats.keys_size += entry.key.len() as u64;
        entries.push(entry);
    }

    if config.verify_entry_count && expected_count != 0 && expected_count as usize != entries.len() {
        return Err(CoreError::invalid_format(format!(
            "header declares {} entries, index holds {}",
            expected_count,
            entries.len()
        )));
    }

    stats.num_keys = entries.len() as u64;
    stats.values_size = value_pos;
    Ok(entries)
}

/// Reads a length-prefixed section, refusing lengths the source cannot hold.
fn read_section<S: RandomAccessSource>(
    source: &S,
    file_size: u64,
    offset: FileOffset,
    len: u32,
) -> CoreResult<Vec<u8>> {
    let available = file_size.saturating_sub(offset.as_u64());
    if u64::from(len) > available {
        return Err(CoreError::UnexpectedEof {
            offset: offset.as_u64(),
            expected: len as usize,
            read: available as usize,
        });
    }
    let mut buf = vec![0u8; len as usize];
    read_exact(source, &mut buf, offset)?;
    Ok(buf)
}

fn read_exact<S: RandomAccessSource>(
    source: &S,
    buf: &mut [u8],
    offset: FileOffset,
) -> CoreResult<()> {
    let read = source.read_full_at(buf, offset.as_u64())?;
    if read < buf.len() {
        return Err(CoreError::UnexpectedEof {
            offset: offset.as_u64(),
            expected: buf.len(),
            read,
        });
    }
    Ok(())
}
