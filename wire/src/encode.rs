//! CBOR-subset encoding sessions
//!
//! Every item starts with a header byte carrying a major type in the top
//! three bits and a 5-bit additional-information field. Values 0-23 ride
//! inline in that field; larger magnitudes use an extension marker
//! followed by the smallest of 1, 2, or 4 big-endian bytes that holds the
//! value. Keeping the width minimal makes every encoding canonical and
//! bounds an integer item at 5 bytes.

use crate::error::{EncodeError, Result};
use crate::sink::ByteSink;

// Major types, pre-shifted into the top three bits of the header byte
const MAJOR_UNSIGNED: u8 = 0 << 5;
const MAJOR_NEGATIVE: u8 = 1 << 5;
const MAJOR_BYTES: u8 = 2 << 5;
const MAJOR_TEXT: u8 = 3 << 5;
const MAJOR_ARRAY: u8 = 4 << 5;
const MAJOR_MAP: u8 = 5 << 5;

// Additional-information markers selecting the extension width
const AI_ONE_BYTE: u8 = 24;
const AI_TWO_BYTES: u8 = 25;
const AI_FOUR_BYTES: u8 = 26;

/// Largest magnitude that rides inline in the header byte
const MAX_INLINE: u32 = 23;

/// Worst-case encoded size of a single integer item (header + 4 bytes)
pub const MAX_INT_ITEM_LEN: usize = 5;

/// One bounded encoding session.
///
/// A session is exclusively owned by one caller and is not reentrant.
/// Materializing sessions ([`Encoder::new`]) stream bytes through a sink
/// and enforce a capacity ceiling; size-only sessions
/// ([`Encoder::size_only`]) never touch a sink and never fail, they just
/// account the bytes the same call sequence would produce.
///
/// The session is finalized exactly once by [`Encoder::finish`], which
/// consumes it and returns the total byte count.
pub struct Encoder<'a> {
    sink: Option<&'a mut dyn ByteSink>,
    limit: usize,
    written: usize,
}

impl<'a> Encoder<'a> {
    /// Begin a materializing session.
    ///
    /// The session will never hand the sink more than `capacity` bytes
    /// in total; an item that would cross the ceiling is rejected before
    /// any of it reaches the sink.
    pub fn new(sink: &'a mut dyn ByteSink, capacity: usize) -> Self {
        Self {
            sink: Some(sink),
            limit: capacity,
            written: 0,
        }
    }

    /// Begin a session that only accounts sizes.
    ///
    /// No sink is involved and the ceiling is unbounded, so encode calls
    /// on a size-only session cannot fail.
    pub fn size_only() -> Encoder<'static> {
        Encoder {
            sink: None,
            limit: usize::MAX,
            written: 0,
        }
    }

    /// Bytes encoded (or accounted) so far.
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    /// Finalize the session, returning the total number of bytes encoded
    /// (or, for a size-only session, the number that would have been).
    pub fn finish(self) -> usize {
        self.written
    }

    /// Emit a map header for `pairs` key/value pairs.
    ///
    /// The encoder does not verify that exactly `pairs` pairs follow;
    /// that is the caller's responsibility.
    pub fn begin_map(&mut self, pairs: u32) -> Result<()> {
        self.encode_head(MAJOR_MAP, pairs)
    }

    /// Emit an array header for `items` items.
    ///
    /// As with [`Encoder::begin_map`], the item count is not verified
    /// against what the caller subsequently writes.
    pub fn begin_array(&mut self, items: u32) -> Result<()> {
        self.encode_head(MAJOR_ARRAY, items)
    }

    /// Encode an unsigned integer item.
    pub fn encode_unsigned(&mut self, value: u32) -> Result<()> {
        self.encode_head(MAJOR_UNSIGNED, value)
    }

    /// Encode a signed integer item.
    ///
    /// Non-negative values take the unsigned path. A negative value `v`
    /// is carried as magnitude `-1 - v` under the negative-integer major
    /// type, computed without overflow for the full `i32` range.
    pub fn encode_signed(&mut self, value: i32) -> Result<()> {
        if value >= 0 {
            return self.encode_unsigned(value as u32);
        }
        self.encode_head(MAJOR_NEGATIVE, value.unsigned_abs() - 1)
    }

    /// Encode an arbitrary binary payload as a byte string.
    pub fn encode_bytes(&mut self, payload: &[u8]) -> Result<()> {
        self.encode_lengthed(MAJOR_BYTES, payload)
    }

    /// Encode UTF-8 text as a text string.
    ///
    /// The length is the string's byte length; no terminator is written.
    pub fn encode_text(&mut self, text: &str) -> Result<()> {
        self.encode_lengthed(MAJOR_TEXT, text.as_bytes())
    }

    /// Emit a header-only item after checking it fits.
    fn encode_head(&mut self, major: u8, value: u32) -> Result<()> {
        self.reserve(head_len(value))?;
        self.put_head(major, value);
        Ok(())
    }

    /// Emit a header followed by a raw payload, checking the whole item
    /// up front so a rejection has no partial side effect.
    fn encode_lengthed(&mut self, major: u8, payload: &[u8]) -> Result<()> {
        let len = payload.len() as u32;
        self.reserve(head_len(len) + payload.len())?;
        self.put_head(major, len);
        self.put(payload);
        Ok(())
    }

    /// Check that `item_len` more bytes fit under the ceiling.
    fn reserve(&self, item_len: usize) -> Result<()> {
        match self.written.checked_add(item_len) {
            Some(total) if total <= self.limit => Ok(()),
            _ => Err(EncodeError::OutOfSpace),
        }
    }

    /// Write the header byte plus minimal big-endian extension bytes.
    fn put_head(&mut self, major: u8, value: u32) {
        if value <= MAX_INLINE {
            self.put(&[major | value as u8]);
        } else if value <= u8::MAX as u32 {
            self.put(&[major | AI_ONE_BYTE, value as u8]);
        } else if value <= u16::MAX as u32 {
            let b = (value as u16).to_be_bytes();
            self.put(&[major | AI_TWO_BYTES, b[0], b[1]]);
        } else {
            let b = value.to_be_bytes();
            self.put(&[major | AI_FOUR_BYTES, b[0], b[1], b[2], b[3]]);
        }
    }

    /// Hand checked bytes to the sink at the session's running offset.
    fn put(&mut self, bytes: &[u8]) {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.write(self.written as u32, bytes);
        }
        self.written += bytes.len();
    }
}

/// Encoded length of a header carrying `value`.
fn head_len(value: u32) -> usize {
    if value <= MAX_INLINE {
        1
    } else if value <= u8::MAX as u32 {
        2
    } else if value <= u16::MAX as u32 {
        3
    } else {
        5
    }
}
