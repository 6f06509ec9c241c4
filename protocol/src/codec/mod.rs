//! # Canonical Binary Codec
//!
//! Two layers:
//!
//! - [`buffer`] is the byte cursor: big-endian fixed-width integers and the
//!   zig-zag varint.
//! - [`types`] builds field codecs on top of it (length-prefixed buffers,
//!   digests, keys, sig pairs, scripts, asset amounts).
//!
//! Transactions, blocks and network messages compose these field codecs.
//! Two implementations that disagree on a single byte here cannot validate
//! each other's signatures, so nothing in this module is lenient.

pub mod buffer;
pub mod error;
pub mod types;

pub use buffer::{zigzag_decode, zigzag_encode, ByteBuffer};
pub use error::CodecError;
