//! # Version 0 Transaction Kinds
//!
//! Every kind shares a [`Tx`] header (timestamp, fee, signatures) and adds its
//! own payload. Only the payload is handled here; the envelope around it
//! (version tag, type byte, header fields, signatures) is written by
//! [`TxVariant`](super::TxVariant).

use crate::asset::Asset;
use crate::codec::types::{
    read_asset, read_buffer, read_public_key, read_script, read_script_hash, read_string,
    write_asset, write_buffer, write_public_key, write_script, write_script_hash, write_string,
};
use crate::codec::{ByteBuffer, CodecError};
use crate::crypto::{PublicKey, ScriptHash, SigPair};
use crate::script::Script;
use crate::timestamp::{Timestamp, TimestampError};

use super::TxType;

/// Fields common to every transaction kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx {
    pub timestamp: Timestamp,
    pub fee: Asset,
    /// Verification order is list order.
    pub signature_pairs: Vec<SigPair>,
}

impl Tx {
    /// An unsigned header.
    pub fn new(timestamp: impl Into<Timestamp>, fee: Asset) -> Self {
        Self {
            timestamp: timestamp.into(),
            fee,
            signature_pairs: Vec::new(),
        }
    }

    /// An unsigned header from a signed or wider timestamp. Values that do
    /// not fit an unsigned 64-bit integer are rejected.
    pub fn try_new<T>(timestamp: T, fee: Asset) -> Result<Self, TimestampError>
    where
        T: TryInto<Timestamp, Error = TimestampError>,
    {
        Ok(Self::new(timestamp.try_into()?, fee))
    }
}

/// The per-kind half of a transaction.
pub trait TxKind: Sized {
    /// The type byte written ahead of this kind's header.
    const TX_TYPE: TxType;

    fn tx_type(&self) -> TxType {
        Self::TX_TYPE
    }

    fn base(&self) -> &Tx;

    fn base_mut(&mut self) -> &mut Tx;

    /// Kind-specific fields only.
    fn serialize_data(&self, buf: &mut ByteBuffer) -> Result<(), CodecError>;

    /// Reads the kind-specific fields and attaches them to `base`.
    fn deserialize_data(buf: &mut ByteBuffer, base: Tx) -> Result<Self, CodecError>;
}

// ---------------------------------------------------------------------------
// Owner
// ---------------------------------------------------------------------------

/// Names the block producer and the wallet that collects rewards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerTx {
    pub base: Tx,
    /// Key that signs blocks.
    pub minter: PublicKey,
    /// Hot wallet that receives rewards.
    pub wallet: ScriptHash,
    /// Script authorizing the previous wallet.
    pub script: Script,
}

impl TxKind for OwnerTx {
    const TX_TYPE: TxType = TxType::Owner;

    fn base(&self) -> &Tx {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Tx {
        &mut self.base
    }

    fn serialize_data(&self, buf: &mut ByteBuffer) -> Result<(), CodecError> {
        write_public_key(buf, &self.minter);
        write_script_hash(buf, &self.wallet);
        write_script(buf, &self.script)
    }

    fn deserialize_data(buf: &mut ByteBuffer, base: Tx) -> Result<Self, CodecError> {
        Ok(Self {
            base,
            minter: read_public_key(buf)?,
            wallet: read_script_hash(buf)?,
            script: read_script(buf)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Mint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintTx {
    pub base: Tx,
    pub to: ScriptHash,
    pub amount: Asset,
    pub attachment: Vec<u8>,
    /// May be empty.
    pub attachment_name: String,
    pub script: Script,
}

impl TxKind for MintTx {
    const TX_TYPE: TxType = TxType::Mint;

    fn base(&self) -> &Tx {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Tx {
        &mut self.base
    }

    fn serialize_data(&self, buf: &mut ByteBuffer) -> Result<(), CodecError> {
        write_script_hash(buf, &self.to);
        write_asset(buf, &self.amount)?;
        write_buffer(buf, &self.attachment)?;
        write_string(buf, &self.attachment_name)?;
        write_script(buf, &self.script)
    }

    fn deserialize_data(buf: &mut ByteBuffer, base: Tx) -> Result<Self, CodecError> {
        Ok(Self {
            base,
            to: read_script_hash(buf)?,
            amount: read_asset(buf)?,
            attachment: read_buffer(buf)?,
            attachment_name: read_string(buf)?,
            script: read_script(buf)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Reward
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardTx {
    pub base: Tx,
    pub to: ScriptHash,
    pub rewards: Asset,
}

impl TxKind for RewardTx {
    const TX_TYPE: TxType = TxType::Reward;

    fn base(&self) -> &Tx {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Tx {
        &mut self.base
    }

    fn serialize_data(&self, buf: &mut ByteBuffer) -> Result<(), CodecError> {
        write_script_hash(buf, &self.to);
        write_asset(buf, &self.rewards)
    }

    fn deserialize_data(buf: &mut ByteBuffer, base: Tx) -> Result<Self, CodecError> {
        Ok(Self {
            base,
            to: read_script_hash(buf)?,
            rewards: read_asset(buf)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTx {
    pub base: Tx,
    pub from: ScriptHash,
    pub to: ScriptHash,
    /// Must hash to `from`.
    pub script: Script,
    pub amount: Asset,
    /// May be empty.
    pub memo: Vec<u8>,
}

impl TxKind for TransferTx {
    const TX_TYPE: TxType = TxType::Transfer;

    fn base(&self) -> &Tx {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Tx {
        &mut self.base
    }

    fn serialize_data(&self, buf: &mut ByteBuffer) -> Result<(), CodecError> {
        write_script_hash(buf, &self.from);
        write_script_hash(buf, &self.to);
        write_script(buf, &self.script)?;
        write_asset(buf, &self.amount)?;
        write_buffer(buf, &self.memo)
    }

    fn deserialize_data(buf: &mut ByteBuffer, base: Tx) -> Result<Self, CodecError> {
        Ok(Self {
            base,
            from: read_script_hash(buf)?,
            to: read_script_hash(buf)?,
            script: read_script(buf)?,
            amount: read_asset(buf)?,
            memo: read_buffer(buf)?,
        })
    }
}
