//! Streaming CBOR-Subset Encoder
//!
//! A minimal, allocation-free encoder for the subset of CBOR (RFC 7049)
//! used by the diagnostics event pipeline: unsigned integers, negative
//! integers, byte strings, text strings, arrays, and maps. No tags,
//! floating point, indefinite-length items, or simple values.
//!
//! Designed for firmware environments: the encoder never allocates,
//! never emits more bytes than the session's capacity ceiling, and
//! streams output through a caller-provided [`ByteSink`] so the backing
//! storage (RAM arena, event ring, flash page) stays out of this crate.
//!
//! # Usage
//!
//! ```ignore
//! use faultline_wire::{Encoder, SliceSink};
//!
//! let mut arena = [0u8; 64];
//! let mut sink = SliceSink::new(&mut arena);
//! let mut enc = Encoder::new(&mut sink, 64);
//!
//! enc.begin_map(1)?;
//! enc.encode_unsigned(1)?;       // key
//! enc.encode_text("online")?;    // value
//! let len = enc.finish();
//!
//! // ... arena[..len] now holds the encoded event ...
//! ```
//!
//! A size-only session walks the same call sequence without a sink and
//! returns the byte count a materializing session would have produced:
//!
//! ```ignore
//! let mut enc = Encoder::size_only();
//! enc.begin_map(1)?;
//! enc.encode_unsigned(1)?;
//! enc.encode_text("online")?;
//! let needed = enc.finish();
//! ```

#![no_std]
#![forbid(unsafe_code)]

mod encode;
mod error;
mod sink;

pub use encode::{Encoder, MAX_INT_ITEM_LEN};
pub use error::{EncodeError, Result};
pub use sink::{ByteSink, SliceSink};
