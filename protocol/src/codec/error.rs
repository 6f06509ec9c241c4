//! Error type shared by the byte cursor and every wire decoder.
//!
//! Each variant names the offending value or offset, so a failed decode can
//! be diagnosed from the error alone.

use thiserror::Error;

use crate::crypto::WifError;

/// Failures while reading or writing the canonical binary form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// An offset assignment fell outside `[0, capacity]`.
    #[error("offset {offset} is outside the bounds of this ByteBuffer (capacity {capacity})")]
    OffsetOutOfBounds { offset: usize, capacity: usize },

    /// A read needed more bytes than the buffer holds.
    #[error("read of {len} bytes at offset {offset} is outside the bounds of this ByteBuffer (capacity {capacity})")]
    OutOfBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    /// A varint kept signalling continuation past 64 bits.
    #[error("overflow reading varint")]
    VarIntOverflow,

    /// A length-prefixed string was not valid UTF-8.
    #[error("invalid utf-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// A digest field was not exactly 32 bytes.
    #[error("expected sha256 digest length (got {0} bytes)")]
    DigestLength(usize),

    /// An asset amount does not fit the signed 64-bit varint encoding.
    #[error("asset amount {0} does not fit in 64 bits")]
    AssetOverflow(String),

    /// A length-prefixed field does not fit a `u32` length.
    #[error("buffer of {0} bytes is too large to serialize")]
    BufferTooLarge(usize),

    /// A list with a single-byte length prefix had too many entries.
    #[error("too many {what} to serialize: {len} (max 255)")]
    TooManyItems { what: &'static str, len: usize },

    /// A key on the wire had an invalid length.
    #[error("invalid key: {0}")]
    InvalidKey(#[from] WifError),

    #[error("unknown tx version: {0}")]
    UnknownTxVersion(u16),

    #[error("unknown tx type deserializing header: {0}")]
    UnknownTxType(u8),

    #[error("unknown block version: {0}")]
    UnknownBlockVersion(u16),

    #[error("block must be signed to serialize")]
    UnsignedBlock,

    /// A child block was requested above the highest representable height.
    #[error("block height {0} has no successor")]
    HeightOverflow(u64),

    /// The IO-failure id on a request or response.
    #[error("message id {0:#x} is reserved for io errors")]
    ReservedMsgId(u32),

    #[error("unknown msg body id: {0}")]
    UnknownMsgBody(u8),

    #[error("unknown request id: {0}")]
    UnknownRequest(u8),

    #[error("unknown response id: {0}")]
    UnknownResponse(u8),

    #[error("unknown error kind: {0}")]
    UnknownErrorKind(u8),

    #[error("unknown tx verify error kind: {0}")]
    UnknownTxVerifyErrorKind(u8),

    #[error("unknown script eval error kind: {0}")]
    UnknownScriptEvalErrorKind(u8),

    #[error("invalid filtered block type: {0}")]
    InvalidFilteredBlockType(u8),

    /// A properties response carried something other than an owner tx.
    #[error("expected owner tx, got tx type {0}")]
    ExpectedOwnerTx(u8),
}
