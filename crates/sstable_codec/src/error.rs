//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding header or index bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended in the middle of a varint, tag or field.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A varint ran past 10 bytes or past 64 bits.
    #[error("varint overflows 64 bits")]
    VarintOverflow,

    /// A tag carried a wire type this codec does not accept.
    #[error("invalid wire type {wire_type} for field {field}")]
    InvalidWireType {
        /// Field number from the tag.
        field: u32,
        /// Raw wire type bits.
        wire_type: u8,
    },

    /// A known field arrived with a different wire type than its schema.
    #[error("field {field} of {message} has wire type {actual}, expected {expected}")]
    WireTypeMismatch {
        /// Message being decoded.
        message: &'static str,
        /// Field number.
        field: u32,
        /// Wire type required by the schema.
        expected: u8,
        /// Wire type found in the input.
        actual: u8,
    },

    /// A varint did not fit the field's integer type.
    #[error("value {value} overflows field {field} of {message}")]
    IntegerOverflow {
        /// Message being decoded.
        message: &'static str,
        /// Field number.
        field: u32,
        /// Decoded value.
        value: u64,
    },

    /// A length-delimited frame declared more bytes than remain.
    #[error("frame declares {declared} bytes but only {remaining} remain")]
    FrameOverrun {
        /// Declared frame length.
        declared: u64,
        /// Bytes left in the input after the length prefix.
        remaining: usize,
    },

    /// Any other malformed input.
    #[error("decoding failed: {message}")]
    DecodingFailed {
        /// Description of the decoding error.
        message: String,
    },
}

impl CodecError {
    /// Create a decoding failed error.
    pub fn decoding_failed(message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            message: message.into(),
        }
    }
}
