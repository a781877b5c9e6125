//! Protobuf wire encoder.

use crate::decoder::WireType;
use crate::varint::{encode_varint, encoded_len_varint};

/// Appends protobuf fields to a byte buffer.
///
/// Every `write_*` method skips the field when it holds the default value,
/// matching proto3 output byte for byte. Callers must write fields in
/// ascending field-number order to stay bit-exact.
pub struct ProtoEncoder<'a> {
    buffer: &'a mut Vec<u8>,
}

impl<'a> ProtoEncoder<'a> {
    /// Creates an encoder appending to `buffer`.
    pub fn new(buffer: &'a mut Vec<u8>) -> Self {
        Self { buffer }
    }

    /// Writes a `uint32` field.
    pub fn write_uint32(&mut self, field: u32, value: u32) {
        self.write_uint64(field, u64::from(value));
    }

    /// Writes a `uint64` field.
    pub fn write_uint64(&mut self, field: u32, value: u64) {
        if value == 0 {
            return;
        }
        self.write_tag(field, WireType::Varint);
        encode_varint(value, &mut *self.buffer);
    }

    /// Writes a `bytes` field.
    pub fn write_bytes(&mut self, field: u32, value: &[u8]) {
        if value.is_empty() {
            return;
        }
        self.write_tag(field, WireType::LengthDelimited);
        encode_varint(value.len() as u64, &mut *self.buffer);
        self.buffer.extend_from_slice(value);
    }

    fn write_tag(&mut self, field: u32, wire_type: WireType) {
        encode_varint(tag(field, wire_type), &mut *self.buffer);
    }
}

fn tag(field: u32, wire_type: WireType) -> u64 {
    (u64::from(field) << 3) | u64::from(wire_type as u8)
}

/// Encoded size of a `uint32`/`uint64` field, zero when it would be skipped.
pub(crate) fn uint_field_len(field: u32, value: u64) -> usize {
    if value == 0 {
        return 0;
    }
    encoded_len_varint(tag(field, WireType::Varint)) + encoded_len_varint(value)
}

/// Encoded size of a `bytes` field, zero when it would be skipped.
pub(crate) fn bytes_field_len(field: u32, value: &[u8]) -> usize {
    if value.is_empty() {
        return 0;
    }
    encoded_len_varint(tag(field, WireType::LengthDelimited))
        + encoded_len_varint(value.len() as u64)
        + value.len()
}
