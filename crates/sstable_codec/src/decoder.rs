//! Protobuf wire decoder.

use crate::error::{CodecError, CodecResult};
use crate::varint::decode_varint;

/// Largest field number protobuf allows.
const MAX_FIELD_NUMBER: u64 = (1 << 29) - 1;

/// Wire types accepted by the decoder.
///
/// Group wire types (3, 4) are deprecated and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    /// Base-128 varint.
    Varint = 0,
    /// Little-endian 8 bytes.
    Fixed64 = 1,
    /// Varint length followed by that many bytes.
    LengthDelimited = 2,
    /// Little-endian 4 bytes.
    Fixed32 = 5,
}

/// One decoded field value, borrowing from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// A varint field.
    Varint(u64),
    /// A fixed 64-bit field.
    Fixed64(u64),
    /// A length-delimited field.
    Bytes(&'a [u8]),
    /// A fixed 32-bit field.
    Fixed32(u32),
}

impl FieldValue<'_> {
    /// Returns the wire type this value was encoded with.
    #[must_use]
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::Varint(_) => WireType::Varint,
            Self::Fixed64(_) => WireType::Fixed64,
            Self::Bytes(_) => WireType::LengthDelimited,
            Self::Fixed32(_) => WireType::Fixed32,
        }
    }
}

/// A streaming decoder over the fields of one message.
pub struct ProtoDecoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ProtoDecoder<'a> {
    /// Create a new decoder for the given message bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Check if all bytes have been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Get remaining bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Decodes the next field, or returns `None` at the end of the message.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input, an invalid field number, or a
    /// wire type outside [`WireType`].
    pub fn next_field(&mut self) -> CodecResult<Option<(u32, FieldValue<'a>)>> {
        if self.is_empty() {
            return Ok(None);
        }

        let tag = self.read_varint()?;
        let field_number = tag >> 3;
        if field_number == 0 || field_number > MAX_FIELD_NUMBER {
            return Err(CodecError::decoding_failed(format!(
                "invalid field number {field_number}"
            )));
        }
        let field = field_number as u32;

        let value = match (tag & 0x07) as u8 {
            0 => FieldValue::Varint(self.read_varint()?),
            1 => {
                let bytes = self.read_bytes(8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(bytes);
                FieldValue::Fixed64(u64::from_le_bytes(raw))
            }
            2 => {
                let len = self.read_varint()?;
                let remaining = self.data.len() - self.pos;
                if len > remaining as u64 {
                    return Err(CodecError::UnexpectedEof);
                }
                FieldValue::Bytes(self.read_bytes(len as usize)?)
            }
            5 => {
                let bytes = self.read_bytes(4)?;
                let mut raw = [0u8; 4];
                raw.copy_from_slice(bytes);
                FieldValue::Fixed32(u32::from_le_bytes(raw))
            }
            wire_type => return Err(CodecError::InvalidWireType { field, wire_type }),
        };

        Ok(Some((field, value)))
    }

    #[inline]
    fn read_varint(&mut self) -> CodecResult<u64> {
        let (value, consumed) = decode_varint(&self.data[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }

    #[inline]
    fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if self.pos + len > self.data.len() {
            return Err(CodecError::UnexpectedEof);
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(data: &[u8]) -> CodecResult<Vec<(u32, FieldValue<'_>)>> {
        let mut decoder = ProtoDecoder::new(data);
        let mut out = Vec::new();
        while let Some(field) = decoder.next_field()? {
            out.push(field);
        }
        Ok(out)
    }

    #[test]
    fn decode_empty_message() {
        assert!(fields(&[]).unwrap().is_empty());
    }

    #[test]
    fn decode_all_wire_types() {
        let data = [
            0x08, 0x96, 0x01, // field 1 varint 150
            0x11, 1, 0, 0, 0, 0, 0, 0, 0, // field 2 fixed64 1
            0x1a, 0x02, b'h', b'i', // field 3 bytes "hi"
            0x25, 2, 0, 0, 0, // field 4 fixed32 2
        ];
        assert_eq!(
            fields(&data).unwrap(),
            vec![
                (1, FieldValue::Varint(150)),
                (2, FieldValue::Fixed64(1)),
                (3, FieldValue::Bytes(b"hi")),
                (4, FieldValue::Fixed32(2)),
            ]
        );
    }

    #[test]
    fn reject_group_wire_types() {
        assert_eq!(
            fields(&[0x0b]),
            Err(CodecError::InvalidWireType {
                field: 1,
                wire_type: 3
            })
        );
        assert!(fields(&[0x0c]).is_err());
        assert!(fields(&[0x0e]).is_err());
    }

    #[test]
    fn reject_field_zero() {
        assert!(matches!(
            fields(&[0x00, 0x01]),
            Err(CodecError::DecodingFailed { .. })
        ));
    }

    #[test]
    fn reject_truncated_bytes_field() {
        assert_eq!(fields(&[0x0a, 0x05, b'a']), Err(CodecError::UnexpectedEof));
    }

    #[test]
    fn reject_truncated_fixed() {
        assert_eq!(fields(&[0x11, 1, 2, 3]), Err(CodecError::UnexpectedEof));
        assert_eq!(fields(&[0x0d, 1]), Err(CodecError::UnexpectedEof));
    }

    #[test]
    fn reject_truncated_tag_value() {
        assert_eq!(fields(&[0x08]), Err(CodecError::UnexpectedEof));
        assert_eq!(fields(&[0x08, 0x80]), Err(CodecError::UnexpectedEof));
    }

    #[test]
    fn remaining_tracks_position() {
        let data = [0x08, 0x01, 0x10, 0x02];
        let mut decoder = ProtoDecoder::new(&data);
        decoder.next_field().unwrap();
        assert_eq!(decoder.remaining(), &[0x10, 0x02]);
        assert!(!decoder.is_empty());
        decoder.next_field().unwrap();
        assert!(decoder.is_empty());
    }
}
