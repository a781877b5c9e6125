//! # SSTable Codec
//!
//! Header and index encoding for sstable files.
//!
//! Both records use the protocol-buffers wire format, so any protobuf
//! implementation given the schema below produces and accepts the same bytes:
//!
//! ```text
//! message TableHeader { uint32 version = 1; uint32 index_length = 2; uint32 index_entries = 3; }
//! message IndexEntry  { bytes key = 1; uint64 offset = 2; uint32 length = 3; bytes extra = 4; }
//! ```
//!
//! ## Encoding Rules
//!
//! - Fields are written in field-number order
//! - Fields holding their default (0 or empty) are omitted
//! - Varints use the shortest encoding, at most 10 bytes
//! - Index records are framed as `varint(len) || message`, back-to-back
//!
//! Decoding is lenient where protobuf is lenient (field order, unknown
//! fields) and strict everywhere else.
//!
//! ## Usage
//!
//! ```
//! use sstable_codec::{Decode, Encode, IndexEntry};
//!
//! let entry = IndexEntry::new(&b"key"[..], 0, 5, &b""[..]);
//! let bytes = entry.encode();
//! assert_eq!(bytes, vec![0x0a, 0x03, b'k', b'e', b'y', 0x18, 0x05]);
//! assert_eq!(IndexEntry::decode(&bytes).unwrap(), entry);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod delimited;
mod encoder;
mod error;
mod message;
mod varint;

pub use decoder::{FieldValue, ProtoDecoder, WireType};
pub use delimited::{encode_delimited, DelimitedFrames};
pub use encoder::ProtoEncoder;
pub use error::{CodecError, CodecResult};
pub use message::{IndexEntry, TableHeader};
pub use varint::{decode_varint, encode_varint, encoded_len_varint, MAX_VARINT_LEN};

/// Trait for records that can be encoded to protobuf wire bytes.
pub trait Encode {
    /// Appends the encoded record to `buf`.
    fn encode_to(&self, buf: &mut Vec<u8>);

    /// Returns the exact number of bytes [`encode_to`](Self::encode_to) appends.
    fn encoded_len(&self) -> usize;

    /// Encodes the record into a fresh buffer.
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_to(&mut buf);
        buf
    }
}

/// Trait for records that can be decoded from protobuf wire bytes.
pub trait Decode: Sized {
    /// Decodes a record occupying all of `bytes`.
    fn decode(bytes: &[u8]) -> CodecResult<Self>;
}
