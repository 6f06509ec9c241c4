//! Script build errors and the evaluation error value carried on the wire.

use std::fmt;

use thiserror::Error;

use crate::codec::{ByteBuffer, CodecError};

/// Failures while assembling a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("script already built")]
    AlreadyBuilt,

    #[error("maximum script size exceeded ({size} bytes)")]
    TooLarge { size: usize },
}

/// What went wrong while evaluating a script. The evaluator itself lives
/// with the node; this crate only carries its verdict between peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ScriptEvalErrorKind {
    UnexpectedEof = 0x00,
    UnknownOp = 0x01,
    InvalidItemOnStack = 0x02,
    StackOverflow = 0x03,
    StackUnderflow = 0x04,
}

impl ScriptEvalErrorKind {
    pub fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0x00 => Self::UnexpectedEof,
            0x01 => Self::UnknownOp,
            0x02 => Self::InvalidItemOnStack,
            0x03 => Self::StackOverflow,
            0x04 => Self::StackUnderflow,
            _ => return None,
        })
    }
}

impl fmt::Display for ScriptEvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnexpectedEof => "unexpected eof",
            Self::UnknownOp => "unknown op",
            Self::InvalidItemOnStack => "invalid item on stack",
            Self::StackOverflow => "stack overflow",
            Self::StackUnderflow => "stack underflow",
        })
    }
}

/// An evaluation failure at a byte position inside the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("{kind} (pos: {position})")]
pub struct ScriptEvalError {
    pub kind: ScriptEvalErrorKind,
    pub position: u32,
}

impl ScriptEvalError {
    pub fn new(kind: ScriptEvalErrorKind, position: u32) -> Self {
        Self { kind, position }
    }

    pub fn serialize(&self, buf: &mut ByteBuffer) {
        buf.write_u8(self.kind as u8).write_u32(self.position);
    }

    pub fn deserialize(buf: &mut ByteBuffer) -> Result<Self, CodecError> {
        let byte = buf.read_u8()?;
        let kind =
            ScriptEvalErrorKind::from_u8(byte).ok_or(CodecError::UnknownScriptEvalErrorKind(byte))?;
        let position = buf.read_u32()?;
        Ok(Self { kind, position })
    }
}
