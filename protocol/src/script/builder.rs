//! Incremental script assembly.

use super::{Operand, Script, ScriptError};
use crate::codec::ByteBuffer;
use crate::config::MAX_SCRIPT_BYTE_SIZE;
use crate::crypto::PublicKey;

/// Accumulates opcodes into a script buffer.
///
/// Once [`build`](Self::build) succeeds the builder is sealed: further pushes
/// fail, while `build` itself keeps returning the same script.
///
/// ```
/// use mark_protocol::script::{Operand, ScriptBuilder};
///
/// let mut builder = ScriptBuilder::new();
/// builder.push(Operand::PushTrue).unwrap();
/// let script = builder.build().unwrap();
/// assert_eq!(script.as_bytes(), &[Operand::PushTrue as u8]);
/// assert!(builder.push(Operand::PushFalse).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ScriptBuilder {
    bytes: ByteBuffer,
    built: bool,
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self {
            bytes: ByteBuffer::alloc(MAX_SCRIPT_BYTE_SIZE),
            built: false,
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.bytes.offset()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The default script for one key: `PushPubKey <key> OpCheckSig`.
    pub fn single_sig(key: &PublicKey) -> Script {
        let mut builder = Self::new();
        builder.write_pubkey(key);
        builder.write_op(Operand::OpCheckSig);
        builder.seal()
    }

    /// Seals the builder and returns the script.
    ///
    /// Fails without sealing when the script is larger than
    /// [`MAX_SCRIPT_BYTE_SIZE`].
    pub fn build(&mut self) -> Result<Script, ScriptError> {
        let size = self.bytes.offset();
        if size > MAX_SCRIPT_BYTE_SIZE {
            return Err(ScriptError::TooLarge { size });
        }
        Ok(self.seal())
    }

    pub fn push(&mut self, op: Operand) -> Result<&mut Self, ScriptError> {
        self.check_not_built()?;
        self.write_op(op);
        Ok(self)
    }

    /// `PushPubKey` followed by the raw 32-byte key.
    pub fn push_pubkey(&mut self, key: &PublicKey) -> Result<&mut Self, ScriptError> {
        self.check_not_built()?;
        self.write_pubkey(key);
        Ok(self)
    }

    /// The multisig opcode (fast-fail variant when requested), then the
    /// threshold byte, then the key count byte.
    pub fn push_check_multisig(
        &mut self,
        threshold: u8,
        key_count: u8,
        fast_fail: bool,
    ) -> Result<&mut Self, ScriptError> {
        let op = if fast_fail {
            Operand::OpCheckMultiSigFastFail
        } else {
            Operand::OpCheckMultiSig
        };
        self.push(op)?;
        self.bytes.write_u8(threshold).write_u8(key_count);
        Ok(self)
    }

    fn write_op(&mut self, op: Operand) {
        self.bytes.write_u8(op as u8);
    }

    fn write_pubkey(&mut self, key: &PublicKey) {
        self.write_op(Operand::PushPubKey);
        self.bytes.write_bytes(key.as_bytes());
    }

    fn seal(&mut self) -> Script {
        self.built = true;
        Script::new(self.bytes.shared_view().to_vec())
    }

    fn check_not_built(&self) -> Result<(), ScriptError> {
        if self.built {
            return Err(ScriptError::AlreadyBuilt);
        }
        Ok(())
    }
}
