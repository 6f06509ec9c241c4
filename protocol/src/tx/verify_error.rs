//! Transaction validation verdicts.
//!
//! Validation runs in the node. A peer that rejects a broadcast reports why
//! with one of these, nested inside a `TxValidation` network error.
//!
//! Wire form: one kind byte. `ScriptEval` is followed by the evaluator's
//! kind byte and a `u32` position.

use thiserror::Error;

use crate::codec::{ByteBuffer, CodecError};
use crate::script::ScriptEvalError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxVerifyError {
    #[error("script hash mismatch")]
    ScriptHashMismatch,

    #[error("script evaluation failed: {0}")]
    ScriptEval(ScriptEvalError),

    #[error("script returned false")]
    ScriptRetFalse,

    #[error("invalid fee amount")]
    InvalidFeeAmount,

    #[error("invalid amount")]
    InvalidAmount,

    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("insufficient fee amount")]
    InsufficientFeeAmount,

    #[error("too many signatures")]
    TooManySignatures,

    #[error("tx too large")]
    TxTooLarge,

    #[error("tx expired")]
    TxExpired,

    #[error("duplicate tx")]
    TxDupe,
}

impl TxVerifyError {
    fn kind(&self) -> u8 {
        match self {
            Self::ScriptHashMismatch => 0x00,
            Self::ScriptEval(_) => 0x01,
            Self::ScriptRetFalse => 0x02,
            Self::InvalidFeeAmount => 0x03,
            Self::InvalidAmount => 0x04,
            Self::InsufficientBalance => 0x05,
            Self::InsufficientFeeAmount => 0x06,
            Self::TooManySignatures => 0x07,
            Self::TxTooLarge => 0x08,
            Self::TxExpired => 0x09,
            Self::TxDupe => 0x0a,
        }
    }

    pub fn serialize(&self, buf: &mut ByteBuffer) {
        buf.write_u8(self.kind());
        if let Self::ScriptEval(err) = self {
            err.serialize(buf);
        }
    }

    pub fn deserialize(buf: &mut ByteBuffer) -> Result<Self, CodecError> {
        Ok(match buf.read_u8()? {
            0x00 => Self::ScriptHashMismatch,
            0x01 => Self::ScriptEval(ScriptEvalError::deserialize(buf)?),
            0x02 => Self::ScriptRetFalse,
            0x03 => Self::InvalidFeeAmount,
            0x04 => Self::InvalidAmount,
            0x05 => Self::InsufficientBalance,
            0x06 => Self::InsufficientFeeAmount,
            0x07 => Self::TooManySignatures,
            0x08 => Self::TxTooLarge,
            0x09 => Self::TxExpired,
            0x0a => Self::TxDupe,
            other => return Err(CodecError::UnknownTxVerifyErrorKind(other)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptEvalErrorKind;

    fn round_trip(err: TxVerifyError) -> TxVerifyError {
        let mut buf = ByteBuffer::alloc(0);
        err.serialize(&mut buf);
        buf.reset_offset();
        TxVerifyError::deserialize(&mut buf).unwrap()
    }

    #[test]
    fn every_kind_round_trips() {
        let all = [
            TxVerifyError::ScriptHashMismatch,
            TxVerifyError::ScriptEval(ScriptEvalError::new(ScriptEvalErrorKind::StackOverflow, 9)),
            TxVerifyError::ScriptRetFalse,
            TxVerifyError::InvalidFeeAmount,
            TxVerifyError::InvalidAmount,
            TxVerifyError::InsufficientBalance,
            TxVerifyError::InsufficientFeeAmount,
            TxVerifyError::TooManySignatures,
            TxVerifyError::TxTooLarge,
            TxVerifyError::TxExpired,
            TxVerifyError::TxDupe,
        ];
        for err in all {
            assert_eq!(round_trip(err.clone()), err);
        }
    }

    #[test]
    fn script_eval_layout() {
        let err =
            TxVerifyError::ScriptEval(ScriptEvalError::new(ScriptEvalErrorKind::UnknownOp, 2));
        let mut buf = ByteBuffer::alloc(0);
        err.serialize(&mut buf);
        assert_eq!(buf.shared_view(), &[0x01, 0x01, 0, 0, 0, 2]);
        assert_eq!(
            err.to_string(),
            "script evaluation failed: unknown op (pos: 2)"
        );
    }

    #[test]
    fn unknown_kind() {
        let mut buf = ByteBuffer::from(vec![0xff]);
        assert_eq!(
            TxVerifyError::deserialize(&mut buf),
            Err(CodecError::UnknownTxVerifyErrorKind(0xff))
        );
    }
}
