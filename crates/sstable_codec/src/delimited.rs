//! Length-delimited framing for back-to-back records.

use crate::error::{CodecError, CodecResult};
use crate::varint::{decode_varint, encode_varint};
use crate::Encode;
use bytes::Bytes;

/// Appends `message` to `buf` prefixed by its varint length.
pub fn encode_delimited<M: Encode>(message: &M, buf: &mut Vec<u8>) {
    encode_varint(message.encoded_len() as u64, buf);
    message.encode_to(buf);
}

/// Iterator over the frames of a length-delimited record stream.
///
/// Each item is the message bytes of one frame, sharing the input buffer.
/// After the first error the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct DelimitedFrames {
    data: Bytes,
    pos: usize,
}

impl DelimitedFrames {
    /// Creates an iterator over the frames in `data`.
    pub fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the byte position of the next frame.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    fn next_frame(&mut self) -> CodecResult<Bytes> {
        let (len, consumed) = decode_varint(&self.data[self.pos..])?;
        let start = self.pos + consumed;
        let remaining = self.data.len() - start;
        if len > remaining as u64 {
            return Err(CodecError::FrameOverrun {
                declared: len,
                remaining,
            });
        }

        let end = start + len as usize;
        self.pos = end;
        Ok(self.data.slice(start..end))
    }
}

impl Iterator for DelimitedFrames {
    type Item = CodecResult<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }

        let frame = self.next_frame();
        if frame.is_err() {
            self.pos = self.data.len();
        }
        Some(frame)
    }
}
