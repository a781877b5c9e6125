//! Unsigned LEB128 varints.

use crate::error::{CodecError, CodecResult};
use bytes::BufMut;

/// Longest encoding of a `u64` varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Appends `value` as a varint.
pub fn encode_varint(mut value: u64, buf: &mut impl BufMut) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Returns the number of bytes [`encode_varint`] writes for `value`.
#[must_use]
pub const fn encoded_len_varint(value: u64) -> usize {
    // ceil(bits / 7), with zero taking one byte
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// Decodes a varint from the front of `data`.
///
/// Returns the value and the number of bytes consumed.
///
/// # Errors
///
/// Returns [`CodecError::UnexpectedEof`] if `data` ends mid-varint and
/// [`CodecError::VarintOverflow`] if the varint does not fit in 64 bits.
pub fn decode_varint(data: &[u8]) -> CodecResult<(u64, usize)> {
    let mut value = 0u64;
    for (i, &byte) in data.iter().enumerate().take(MAX_VARINT_LEN) {
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(CodecError::VarintOverflow);
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte < 0x80 {
            return Ok((value, i + 1));
        }
    }

    if data.len() >= MAX_VARINT_LEN {
        Err(CodecError::VarintOverflow)
    } else {
        Err(CodecError::UnexpectedEof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        buf
    }

    #[test]
    fn encode_known_values() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(1), vec![0x01]);
        assert_eq!(encode(127), vec![0x7f]);
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xac, 0x02]);
        assert_eq!(encode(16_384), vec![0x80, 0x80, 0x01]);
        assert_eq!(
            encode(u64::MAX),
            vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]
        );
    }

    #[test]
    fn encoded_len_matches_encoding() {
        for value in [0, 1, 127, 128, 16_383, 16_384, u64::from(u32::MAX), u64::MAX] {
            assert_eq!(encoded_len_varint(value), encode(value).len(), "{value}");
        }
    }

    #[test]
    fn decode_known_values() {
        assert_eq!(decode_varint(&[0x00]).unwrap(), (0, 1));
        assert_eq!(decode_varint(&[0xac, 0x02]).unwrap(), (300, 2));
        assert_eq!(decode_varint(&[0xac, 0x02, 0xff]).unwrap(), (300, 2));
    }

    #[test]
    fn decode_truncated() {
        assert_eq!(decode_varint(&[]), Err(CodecError::UnexpectedEof));
        assert_eq!(decode_varint(&[0x80]), Err(CodecError::UnexpectedEof));
        assert_eq!(decode_varint(&[0xff, 0xff]), Err(CodecError::UnexpectedEof));
    }

    #[test]
    fn decode_overflow() {
        let mut too_wide = vec![0xff; 9];
        too_wide.push(0x02);
        assert_eq!(decode_varint(&too_wide), Err(CodecError::VarintOverflow));

        let too_long = vec![0x80; 11];
        assert_eq!(decode_varint(&too_long), Err(CodecError::VarintOverflow));
    }

    proptest::proptest! {
        #[test]
        fn varint_roundtrip(value in proptest::prelude::any::<u64>()) {
            let bytes = encode(value);
            proptest::prop_assert_eq!(decode_varint(&bytes).unwrap(), (value, bytes.len()));
        }
    }
}
