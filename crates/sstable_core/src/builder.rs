//! Table builder.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::format::{FORMAT_VERSION, HEADER_LEN_FIELD_SIZE, MAX_KEY_LEN, MAX_VALUE_LEN};
use crate::stats::BuildInfo;
use bytes::Bytes;
use sstable_codec::{encode_delimited, Encode, IndexEntry, TableHeader};
use std::io::{self, BufWriter, Write};
use tracing::{debug, trace};

/// A key whose value bytes still have to be produced during `build`.
struct PendingValue {
    key: Bytes,
    length: u32,
}

/// Writes one table from entries added in strictly increasing key order.
///
/// Only the encoded index and the keys of non-empty values are held in
/// memory. Value bytes are produced on demand by the value writer during
/// [`build`](Self::build) and streamed straight to the sink, so a table's
/// values may be far larger than available memory.
///
/// The value writer is called as `value_writer(key, destination)` once per
/// entry with a nonzero length, in key order. It must write exactly the
/// length declared in [`add`](Self::add) and return that count.
///
/// # Example
///
/// ```
/// use sstable_core::Builder;
/// use std::io::{self, Write};
///
/// let mut table = Vec::new();
/// let mut builder = Builder::new(&mut table, |_key: &[u8], dest: &mut dyn Write| -> io::Result<u64> {
///     dest.write_all(b"value")?;
///     Ok(5)
/// });
/// builder.add(b"key", 5, b"");
/// let info = builder.build().unwrap();
/// assert_eq!(info.entry_count, 1);
/// assert_eq!(info.file_length, table.len() as u64);
/// ```
pub struct Builder<W, F>
where
    W: Write,
    F: FnMut(&[u8], &mut dyn Write) -> io::Result<u64>,
{
    sink: W,
    value_writer: F,
    config: Config,
    index: Vec<u8>,
    pending: Vec<PendingValue>,
    prev: Option<Bytes>,
    entry_count: u64,
    value_pos: u64,
}

impl<W, F> Builder<W, F>
where
    W: Write,
    F: FnMut(&[u8], &mut dyn Write) -> io::Result<u64>,
{
    /// Creates a builder writing to `sink` with the default configuration.
    pub fn new(sink: W, value_writer: F) -> Self {
        Self::with_config(sink, value_writer, Config::default())
    }

    /// Creates a builder with an explicit configuration.
    pub fn with_config(sink: W, value_writer: F, config: Config) -> Self {
        Self {
            sink,
            value_writer,
            config,
            index: Vec::new(),
            pending: Vec::new(),
            prev: None,
            entry_count: 0,
            value_pos: 0,
        }
    }

    /// Registers an entry.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not strictly greater than the previously added
    /// key, if `key` is longer than [`MAX_KEY_LEN`], or if `value_length`
    /// exceeds [`MAX_VALUE_LEN`]. These are caller bugs: the table being
    /// built is known to be invalid. Use [`try_add`](Self::try_add) to get
    /// an error instead.
    pub fn add(&mut self, key: &[u8], value_length: u32, extra: &[u8]) {
        if let Err(e) = self.try_add(key, value_length, extra) {
            panic!("{e}");
        }
    }

    /// Registers an entry, returning an error where [`add`](Self::add) panics.
    ///
    /// A rejected entry leaves the builder unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidEntry`] for an out-of-order, oversize
    /// key or an oversize value length.
    pub fn try_add(&mut self, key: &[u8], value_length: u32, extra: &[u8]) -> CoreResult<()> {
        if let Some(prev) = &self.prev {
            if key <= prev.as_ref() {
                return Err(CoreError::invalid_entry(format!(
                    "key \"{}\" is not after previous \"{}\"",
                    key.escape_ascii(),
                    prev.escape_ascii()
                )));
            }
        }
        if key.len() > MAX_KEY_LEN {
            return Err(CoreError::invalid_entry(format!(
                "key length {} > {}",
                key.len(),
                MAX_KEY_LEN
            )));
        }
        if value_length > MAX_VALUE_LEN {
            return Err(CoreError::invalid_entry(format!(
                "value length {value_length} > {MAX_VALUE_LEN}"
            )));
        }

        // The caller's key buffer may be reused after this call returns.
        let key = Bytes::copy_from_slice(key);
        let entry = IndexEntry {
            key: key.clone(),
            offset: self.value_pos,
            length: value_length,
            extra: Bytes::copy_from_slice(extra),
        };
        encode_delimited(&entry, &mut self.index);

        if value_length > 0 {
            self.pending.push(PendingValue {
                key: key.clone(),
                length: value_length,
            });
        }
        self.prev = Some(key);
        self.entry_count += 1;
        self.value_pos += u64::from(value_length);
        Ok(())
    }

    /// Returns the number of entries added so far.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.entry_count
    }

    /// Returns true if no entries have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Returns the total value bytes declared so far.
    #[must_use]
    pub fn data_size(&self) -> u64 {
        self.value_pos
    }

    /// Writes the header, the index and every value, then flushes the sink.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error from the sink or the value writer, or
    /// [`CoreError::InvalidOperation`] if the index or entry count does not
    /// fit the header's 32-bit fields.
    ///
    /// # Panics
    ///
    /// Panics if the value writer writes, or reports, a byte count other
    /// than the length declared for that key. This must never happen if
    /// callers honor the value writer contract.
    pub fn build(self) -> CoreResult<BuildInfo> {
        let Self {
            sink,
            mut value_writer,
            config,
            index,
            pending,
            entry_count,
            value_pos,
            ..
        } = self;

        let index_length = u32::try_from(index.len()).map_err(|_| {
            CoreError::invalid_operation(format!("index of {} bytes exceeds 4 GiB", index.len()))
        })?;
        let index_entries = if config.record_entry_count {
            u32::try_from(entry_count).map_err(|_| {
                CoreError::invalid_operation(format!("{entry_count} entries exceed u32"))
            })?
        } else {
            0
        };
        let header = TableHeader {
            version: FORMAT_VERSION,
            index_length,
            index_entries,
        };
        let header_bytes = header.encode();
        let header_size = header_bytes.len() as u32;

        let mut writer = BufWriter::with_capacity(config.write_buffer_size, sink);
        writer.write_all(&header_size.to_le_bytes())?;
        writer.write_all(&header_bytes)?;
        writer.write_all(&index)?;
        drop(index);

        for value in &pending {
            let declared = u64::from(value.length);
            let mut dest = CountingWriter::new(&mut writer);
            let reported = value_writer(&value.key, &mut dest)?;
            let written = dest.written;

            assert_eq!(
                written,
                declared,
                "value writer wrote {written} bytes for key \"{}\", declared {declared}",
                value.key.escape_ascii()
            );
            assert_eq!(
                reported,
                declared,
                "value writer reported {reported} bytes for key \"{}\", declared {declared}",
                value.key.escape_ascii()
            );
            trace!(key = %value.key.escape_ascii(), length = declared, "wrote value");
        }
        writer.flush()?;

        let info = BuildInfo {
            entry_count,
            header_size,
            index_size: index_length,
            data_size: value_pos,
            file_length: HEADER_LEN_FIELD_SIZE
                + u64::from(header_size)
                + u64::from(index_length)
                + value_pos,
        };
        debug!(
            entries = info.entry_count,
            index_size = info.index_size,
            data_size = info.data_size,
            "built table"
        );
        Ok(info)
    }
}

/// Counts the bytes a value writer pushes through.
struct CountingWriter<'a, W: Write> {
    inner: &'a mut W,
    written: u64,
}

impl<'a, W: Write> CountingWriter<'a, W> {
    fn new(inner: &'a mut W) -> Self {
        Self { inner, written: 0 }
    }
}

impl<W: Write> Write for CountingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn writer_for(
        values: BTreeMap<Vec<u8>, Vec<u8>>,
    ) -> impl FnMut(&[u8], &mut dyn Write) -> io::Result<u64> {
        move |key: &[u8], dest: &mut dyn Write| -> io::Result<u64> {
            let value = &values[key];
            dest.write_all(value)?;
            Ok(value.len() as u64)
        }
    }

    fn no_values() -> impl FnMut(&[u8], &mut dyn Write) -> io::Result<u64> {
        |key: &[u8], _dest: &mut dyn Write| -> io::Result<u64> {
            panic!("unexpected value request for {key:?}")
        }
    }

    #[test]
    fn build_empty_table() {
        let mut out = Vec::new();
        let info = Builder::new(&mut out, no_values()).build().unwrap();
        assert_eq!(out, vec![0x02, 0, 0, 0, 0x08, 0x01]);
        assert_eq!(info.entry_count, 0);
        assert_eq!(info.file_length, 6);
    }

    #[test]
    fn build_single_entry_bytes() {
        let values = BTreeMap::from([(b"a".to_vec(), b"xy".to_vec())]);
        let mut out = Vec::new();
        let mut builder = Builder::new(&mut out, writer_for(values));
        builder.add(b"a", 2, b"");
        let info = builder.build().unwrap();

        assert_eq!(
            out,
            vec![
                0x06, 0, 0, 0, // header length
                0x08, 0x01, 0x10, 0x06, 0x18, 0x01, // header
                0x05, 0x0a, 0x01, b'a', 0x18, 0x02, // index
                b'x', b'y', // values
            ]
        );
        assert_eq!(
            info,
            BuildInfo {
                entry_count: 1,
                header_size: 6,
                index_size: 6,
                data_size: 2,
                file_length: 18,
            }
        );
    }

    #[test]
    fn entry_count_can_be_left_unset() {
        let mut out = Vec::new();
        let mut builder = Builder::with_config(
            &mut out,
            no_values(),
            Config::default().record_entry_count(false),
        );
        builder.add(b"a", 0, b"");
        builder.build().unwrap();

        // header: version 1, index_length 4, no entry count
        assert_eq!(&out[..8], &[0x04, 0, 0, 0, 0x08, 0x01, 0x10, 0x04]);
    }

    #[test]
    fn zero_length_values_skip_the_writer() {
        let mut out = Vec::new();
        let mut builder = Builder::new(&mut out, no_values());
        builder.add(b"meta-only", 0, &[1, 2, 3]);
        builder.add(b"meta-only-2", 0, &[4]);
        let info = builder.build().unwrap();
        assert_eq!(info.data_size, 0);
        assert_eq!(info.file_length, out.len() as u64);
    }

    #[test]
    fn offsets_accumulate() {
        let mut builder = Builder::new(Vec::new(), no_values());
        builder.add(b"a", 3, b"");
        builder.add(b"b", 0, b"");
        builder.add(b"c", 4, b"");
        assert_eq!(builder.len(), 3);
        assert_eq!(builder.data_size(), 7);
        assert!(!builder.is_empty());
    }

    #[test]
    fn writer_called_in_key_order() {
        let mut seen = Vec::new();
        let mut out = Vec::new();
        let mut builder = Builder::new(&mut out, |key: &[u8], dest: &mut dyn Write| -> io::Result<u64> {
            seen.push(key.to_vec());
            dest.write_all(&[0])?;
            Ok(1)
        });
        builder.add(b"a", 1, b"");
        builder.add(b"b", 0, b"");
        builder.add(b"c", 1, b"");
        builder.build().unwrap();
        assert_eq!(seen, vec![b"a".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn caller_key_buffer_may_be_reused() {
        let values = BTreeMap::from([(b"k1".to_vec(), b"1".to_vec()), (b"k2".to_vec(), b"2".to_vec())]);
        let mut out = Vec::new();
        let mut builder = Builder::new(&mut out, writer_for(values));
        let mut key = b"k1".to_vec();
        builder.add(&key, 1, b"");
        key[1] = b'2';
        builder.add(&key, 1, b"");
        builder.build().unwrap();
        assert_eq!(&out[out.len() - 2..], b"12");
    }

    #[test]
    fn try_add_rejects_without_side_effects() {
        let mut builder = Builder::new(Vec::new(), no_values());
        builder.try_add(b"b", 1, b"").unwrap();

        for key in [&b"a"[..], &b"b"[..]] {
            let err = builder.try_add(key, 1, b"").unwrap_err();
            assert!(matches!(err, CoreError::InvalidEntry { .. }), "{err}");
        }
        assert!(builder.try_add(&[b'c'; MAX_KEY_LEN + 1], 1, b"").is_err());
        assert!(builder.try_add(b"c", MAX_VALUE_LEN + 1, b"").is_err());

        assert_eq!(builder.len(), 1);
        assert_eq!(builder.data_size(), 1);
        builder.try_add(&[b'c'; MAX_KEY_LEN], MAX_VALUE_LEN, b"").unwrap();
    }

    #[test]
    fn empty_key_first_is_allowed() {
        let mut builder = Builder::new(Vec::new(), no_values());
        builder.add(b"", 0, b"");
        builder.add(b"\x00", 0, b"");
        assert_eq!(builder.len(), 2);
    }

    #[test]
    #[should_panic(expected = "is not after previous")]
    fn add_out_of_order_panics() {
        let mut builder = Builder::new(Vec::new(), no_values());
        builder.add(b"b", 0, b"");
        builder.add(b"a", 0, b"");
    }

    #[test]
    #[should_panic(expected = "is not after previous")]
    fn add_duplicate_panics() {
        let mut builder = Builder::new(Vec::new(), no_values());
        builder.add(b"a", 0, b"");
        builder.add(b"a", 0, b"");
    }

    #[test]
    #[should_panic(expected = "key length 257 > 256")]
    fn add_long_key_panics() {
        let mut builder = Builder::new(Vec::new(), no_values());
        builder.add(&[b'a'; 257], 0, b"");
    }

    #[test]
    #[should_panic(expected = "value length")]
    fn add_huge_value_panics() {
        let mut builder = Builder::new(Vec::new(), no_values());
        builder.add(b"a", MAX_VALUE_LEN + 1, b"");
    }

    #[test]
    #[should_panic(expected = "value writer wrote 2 bytes")]
    fn short_value_write_panics() {
        let mut builder = Builder::new(Vec::new(), |_: &[u8], dest: &mut dyn Write| -> io::Result<u64> {
            dest.write_all(b"ab")?;
            Ok(3)
        });
        builder.add(b"a", 3, b"");
        let _ = builder.build();
    }

    #[test]
    #[should_panic(expected = "value writer reported 4 bytes")]
    fn misreported_value_length_panics() {
        let mut builder = Builder::new(Vec::new(), |_: &[u8], dest: &mut dyn Write| -> io::Result<u64> {
            dest.write_all(b"abc")?;
            Ok(4)
        });
        builder.add(b"a", 3, b"");
        let _ = builder.build();
    }

    #[test]
    fn value_writer_error_propagates() {
        let mut builder = Builder::new(Vec::new(), |_: &[u8], _: &mut dyn Write| -> io::Result<u64> {
            Err(io::Error::other("producer failed"))
        });
        builder.add(b"a", 3, b"");
        let err = builder.build().unwrap_err();
        assert!(matches!(err, CoreError::Io(ref e) if e.to_string() == "producer failed"));
    }

    /// Accepts a fixed number of bytes, then reports a zero-length write.
    struct FullSink {
        capacity: usize,
        data: Vec<u8>,
    }

    impl Write for FullSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.capacity - self.data.len());
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn short_sink_write_is_an_error() {
        let sink = FullSink {
            capacity: 10,
            data: Vec::new(),
        };
        let mut builder = Builder::with_config(
            sink,
            |_: &[u8], dest: &mut dyn Write| -> io::Result<u64> {
                dest.write_all(&[0u8; 64])?;
                Ok(64)
            },
            Config::default().write_buffer_size(8),
        );
        builder.add(b"a", 64, b"");
        let err = builder.build().unwrap_err();
        assert!(err.is_io());
    }
}
