//! # Authorization Scripts
//!
//! A script is an immutable opcode sequence that decides whether a set of
//! signatures may spend from an account. The account's address is the
//! script's double SHA-256 ([`ScriptHash`]).
//!
//! This crate builds and encodes scripts. Executing them is the node's job;
//! only the evaluator's error value ([`ScriptEvalError`]) travels through
//! here, because peers report it back inside network errors.

pub mod builder;
pub mod error;

use crate::crypto::{double_sha256, ScriptHash};

pub use builder::ScriptBuilder;
pub use error::{ScriptError, ScriptEvalError, ScriptEvalErrorKind};

/// Script opcodes. One byte each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Operand {
    // Push value
    PushFalse = 0x00,
    PushTrue = 0x01,
    PushPubKey = 0x02,

    // Stack manipulation
    OpNot = 0x10,

    // Control
    OpIf = 0x20,
    OpElse = 0x21,
    OpEndIf = 0x22,
    OpReturn = 0x23,

    // Crypto
    OpCheckSig = 0x30,
    OpCheckSigFastFail = 0x31,
    OpCheckMultiSig = 0x32,
    OpCheckMultiSigFastFail = 0x33,
}

impl Operand {
    pub fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0x00 => Self::PushFalse,
            0x01 => Self::PushTrue,
            0x02 => Self::PushPubKey,
            0x10 => Self::OpNot,
            0x20 => Self::OpIf,
            0x21 => Self::OpElse,
            0x22 => Self::OpEndIf,
            0x23 => Self::OpReturn,
            0x30 => Self::OpCheckSig,
            0x31 => Self::OpCheckSigFastFail,
            0x32 => Self::OpCheckMultiSig,
            0x33 => Self::OpCheckMultiSigFastFail,
            _ => return None,
        })
    }
}

/// Immutable script bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Script(Vec<u8>);

impl Script {
    /// Wraps raw bytes. Size is not checked here; scripts decoded from the
    /// wire are validated by whoever evaluates them.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The account address controlled by this script.
    pub fn hash(&self) -> ScriptHash {
        ScriptHash(double_sha256(&self.0))
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operand_bytes_round_trip() {
        for byte in 0..=u8::MAX {
            if let Some(op) = Operand::from_u8(byte) {
                assert_eq!(op as u8, byte);
            }
        }
        assert_eq!(Operand::from_u8(0x03), None);
        assert_eq!(Operand::from_u8(0x34), None);
    }

    #[test]
    fn hash_is_double_sha256_of_bytes() {
        let script = Script::new(vec![0x01, 0x30]);
        assert_eq!(script.hash().0, double_sha256(&[0x01, 0x30]));
        assert_ne!(script.hash(), Script::new(vec![0x00, 0x30]).hash());
    }
}
