//! Errors a peer reports back in place of a response.
//!
//! Only [`NetworkError::TxValidation`] carries a payload, and it always
//! does: the enum makes any other combination unrepresentable.

use thiserror::Error;

use crate::codec::{ByteBuffer, CodecError};
use crate::tx::TxVerifyError;

/// Wire discriminant of a [`NetworkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NetErrorKind {
    Io = 0x00,
    BytesRemaining = 0x01,
    InvalidRequest = 0x02,
    InvalidHeight = 0x03,
    TxValidation = 0x04,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("io error")]
    Io,

    #[error("bytes remaining")]
    BytesRemaining,

    #[error("invalid request")]
    InvalidRequest,

    #[error("invalid block height")]
    InvalidHeight,

    #[error("tx validation: {0}")]
    TxValidation(TxVerifyError),
}

impl NetworkError {
    pub fn kind(&self) -> NetErrorKind {
        match self {
            Self::Io => NetErrorKind::Io,
            Self::BytesRemaining => NetErrorKind::BytesRemaining,
            Self::InvalidRequest => NetErrorKind::InvalidRequest,
            Self::InvalidHeight => NetErrorKind::InvalidHeight,
            Self::TxValidation(_) => NetErrorKind::TxValidation,
        }
    }

    pub fn serialize(&self, buf: &mut ByteBuffer) {
        buf.write_u8(self.kind() as u8);
        if let Self::TxValidation(err) = self {
            err.serialize(buf);
        }
    }

    pub fn deserialize(buf: &mut ByteBuffer) -> Result<Self, CodecError> {
        Ok(match buf.read_u8()? {
            0x00 => Self::Io,
            0x01 => Self::BytesRemaining,
            0x02 => Self::InvalidRequest,
            0x03 => Self::InvalidHeight,
            0x04 => Self::TxValidation(TxVerifyError::deserialize(buf)?),
            other => return Err(CodecError::UnknownErrorKind(other)),
        })
    }
}
