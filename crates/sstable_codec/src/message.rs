//! Header and index entry records.

use crate::decoder::{FieldValue, ProtoDecoder, WireType};
use crate::encoder::{bytes_field_len, uint_field_len, ProtoEncoder};
use crate::error::{CodecError, CodecResult};
use crate::{Decode, Encode};
use bytes::Bytes;

/// The table header, stored right after the 4-byte header length field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableHeader {
    /// Format version of the table.
    pub version: u32,
    /// Exact byte length of the encoded index section.
    pub index_length: u32,
    /// Number of index entries, or 0 when the writer did not record it.
    pub index_entries: u32,
}

impl TableHeader {
    const VERSION: u32 = 1;
    const INDEX_LENGTH: u32 = 2;
    const INDEX_ENTRIES: u32 = 3;
}

impl Encode for TableHeader {
    fn encode_to(&self, buf: &mut Vec<u8>) {
        let mut encoder = ProtoEncoder::new(buf);
        encoder.write_uint32(Self::VERSION, self.version);
        encoder.write_uint32(Self::INDEX_LENGTH, self.index_length);
        encoder.write_uint32(Self::INDEX_ENTRIES, self.index_entries);
    }

    fn encoded_len(&self) -> usize {
        uint_field_len(Self::VERSION, u64::from(self.version))
            + uint_field_len(Self::INDEX_LENGTH, u64::from(self.index_length))
            + uint_field_len(Self::INDEX_ENTRIES, u64::from(self.index_entries))
    }
}

impl Decode for TableHeader {
    fn decode(bytes: &[u8]) -> CodecResult<Self> {
        const NAME: &str = "TableHeader";

        let mut header = Self::default();
        let mut decoder = ProtoDecoder::new(bytes);
        while let Some((field, value)) = decoder.next_field()? {
            match field {
                Self::VERSION => header.version = expect_u32(NAME, field, value)?,
                Self::INDEX_LENGTH => header.index_length = expect_u32(NAME, field, value)?,
                Self::INDEX_ENTRIES => header.index_entries = expect_u32(NAME, field, value)?,
                _ => {}
            }
        }
        Ok(header)
    }
}

/// One index record: where a key's value lives and its opaque metadata.
///
/// `offset` is relative to the start of the value region, not the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexEntry {
    /// Key bytes.
    pub key: Bytes,
    /// Cumulative length of all preceding values.
    pub offset: u64,
    /// Length of this entry's value; 0 means "extra only".
    pub length: u32,
    /// Caller-opaque metadata stored alongside the value.
    pub extra: Bytes,
}

impl IndexEntry {
    const KEY: u32 = 1;
    const OFFSET: u32 = 2;
    const LENGTH: u32 = 3;
    const EXTRA: u32 = 4;

    /// Creates an index entry.
    pub fn new(key: impl Into<Bytes>, offset: u64, length: u32, extra: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            offset,
            length,
            extra: extra.into(),
        }
    }

    /// Decodes an entry whose `key` and `extra` share `buf`'s allocation.
    ///
    /// # Errors
    ///
    /// Returns an error if `buf` is not a well-formed `IndexEntry`.
    pub fn decode_shared(buf: &Bytes) -> CodecResult<Self> {
        Self::decode_with(buf, |slice| buf.slice_ref(slice))
    }

    fn decode_with<'a>(data: &'a [u8], to_bytes: impl Fn(&'a [u8]) -> Bytes) -> CodecResult<Self> {
        const NAME: &str = "IndexEntry";

        let mut entry = Self::default();
        let mut decoder = ProtoDecoder::new(data);
        while let Some((field, value)) = decoder.next_field()? {
            match field {
                Self::KEY => entry.key = to_bytes(expect_bytes(NAME, field, value)?),
                Self::OFFSET => entry.offset = expect_varint(NAME, field, value)?,
                Self::LENGTH => entry.length = expect_u32(NAME, field, value)?,
                Self::EXTRA => entry.extra = to_bytes(expect_bytes(NAME, field, value)?),
                _ => {}
            }
        }
        Ok(entry)
    }
}

impl Encode for IndexEntry {
    fn encode_to(&self, buf: &mut Vec<u8>) {
        let mut encoder = ProtoEncoder::new(buf);
        encoder.write_bytes(Self::KEY, &self.key);
        encoder.write_uint64(Self::OFFSET, self.offset);
        encoder.write_uint32(Self::LENGTH, self.length);
        encoder.write_bytes(Self::EXTRA, &self.extra);
    }

    fn encoded_len(&self) -> usize {
        bytes_field_len(Self::KEY, &self.key)
            + uint_field_len(Self::OFFSET, self.offset)
            + uint_field_len(Self::LENGTH, u64::from(self.length))
            + bytes_field_len(Self::EXTRA, &self.extra)
    }
}

impl Decode for IndexEntry {
    fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Self::decode_with(bytes, Bytes::copy_from_slice)
    }
}

fn mismatch(message: &'static str, field: u32, expected: WireType, value: FieldValue<'_>) -> CodecError {
    CodecError::WireTypeMismatch {
        message,
        field,
        expected: expected as u8,
        actual: value.wire_type() as u8,
    }
}

fn expect_varint(message: &'static str, field: u32, value: FieldValue<'_>) -> CodecResult<u64> {
    match value {
        FieldValue::Varint(v) => Ok(v),
        other => Err(mismatch(message, field, WireType::Varint, other)),
    }
}

fn expect_u32(message: &'static str, field: u32, value: FieldValue<'_>) -> CodecResult<u32> {
    let v = expect_varint(message, field, value)?;
    u32::try_from(v).map_err(|_| CodecError::IntegerOverflow {
        message,
        field,
        value: v,
    })
}

fn expect_bytes<'a>(
    message: &'static str,
    field: u32,
    value: FieldValue<'a>,
) -> CodecResult<&'a [u8]> {
    match value {
        FieldValue::Bytes(b) => Ok(b),
        other => Err(mismatch(message, field, WireType::LengthDelimited, other)),
    }
}
