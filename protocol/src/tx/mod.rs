//! # Transactions
//!
//! A transaction is a versioned, closed sum type:
//!
//! ```text
//! TxVariant::V0
//!   ├── OwnerTx     minter key, reward wallet, wallet script
//!   ├── MintTx      new tokens to an address, with an attachment
//!   ├── RewardTx    block reward to an address
//!   └── TransferTx  tokens between addresses, with a memo
//! ```
//!
//! ## Wire format
//!
//! ```text
//! version    u16          always 0 today
//! type       u8           OWNER=0 MINT=1 REWARD=2 TRANSFER=3
//! timestamp  u64          epoch milliseconds
//! fee        varint       zig-zag scaled asset amount
//! data       ...          kind specific
//! sig_count  u8           only when signatures are included
//! sigs       96 * n       public key || signature
//! ```
//!
//! The form without the trailing signatures is what gets signed and what the
//! transaction id commits to. Adding a signature therefore never changes the
//! id or invalidates earlier signatures.

pub mod kinds;
pub mod verify_error;

use std::fmt;

use tracing::{debug, trace};

use crate::asset::Asset;
use crate::codec::types::{read_asset, read_sig_pairs, write_asset, write_sig_pairs};
use crate::codec::{ByteBuffer, CodecError};
use crate::config::{TX_BUF_CAPACITY, TX_VERSION_V0};
use crate::crypto::{double_sha256, Digest, KeyPair, SigPair};
use crate::timestamp::Timestamp;

pub use kinds::{MintTx, OwnerTx, RewardTx, TransferTx, Tx, TxKind};
pub use verify_error::TxVerifyError;

/// Transaction kind discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TxType {
    Owner = 0,
    Mint = 1,
    Reward = 2,
    Transfer = 3,
}

impl TxType {
    pub fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => Self::Owner,
            1 => Self::Mint,
            2 => Self::Reward,
            3 => Self::Transfer,
            _ => return None,
        })
    }
}

/// Double SHA-256 of a transaction's unsigned serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxId(pub Digest);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// All version 0 transaction kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxVariantV0 {
    OwnerTx(OwnerTx),
    MintTx(MintTx),
    RewardTx(RewardTx),
    TransferTx(TransferTx),
}

/// Applies `$body` to the concrete kind inside a [`TxVariantV0`].
macro_rules! with_kind {
    ($tx:expr, $kind:ident => $body:expr) => {
        match $tx {
            TxVariantV0::OwnerTx($kind) => $body,
            TxVariantV0::MintTx($kind) => $body,
            TxVariantV0::RewardTx($kind) => $body,
            TxVariantV0::TransferTx($kind) => $body,
        }
    };
}

impl TxVariantV0 {
    pub fn tx_type(&self) -> TxType {
        with_kind!(self, tx => tx.tx_type())
    }

    pub fn base(&self) -> &Tx {
        with_kind!(self, tx => tx.base())
    }

    pub fn base_mut(&mut self) -> &mut Tx {
        with_kind!(self, tx => tx.base_mut())
    }

    fn serialize(&self, buf: &mut ByteBuffer, include_sigs: bool) -> Result<(), CodecError> {
        let base = self.base();
        buf.write_u8(self.tx_type() as u8);
        buf.write_u64(base.timestamp.as_millis());
        write_asset(buf, &base.fee)?;

        with_kind!(self, tx => tx.serialize_data(buf))?;

        if include_sigs {
            write_sig_pairs(buf, &base.signature_pairs)?;
        }
        Ok(())
    }

    fn deserialize(buf: &mut ByteBuffer) -> Result<Self, CodecError> {
        let byte = buf.read_u8()?;
        let Some(tx_type) = TxType::from_u8(byte) else {
            debug!(tx_type = byte, "rejecting tx with unknown type");
            return Err(CodecError::UnknownTxType(byte));
        };
        let timestamp = Timestamp::from_millis(buf.read_u64()?);
        let fee = read_asset(buf)?;
        let base = Tx::new(timestamp, fee);

        let mut tx = match tx_type {
            TxType::Owner => Self::OwnerTx(OwnerTx::deserialize_data(buf, base)?),
            TxType::Mint => Self::MintTx(MintTx::deserialize_data(buf, base)?),
            TxType::Reward => Self::RewardTx(RewardTx::deserialize_data(buf, base)?),
            TxType::Transfer => Self::TransferTx(TransferTx::deserialize_data(buf, base)?),
        };
        tx.base_mut().signature_pairs = read_sig_pairs(buf)?;
        Ok(tx)
    }
}

/// A transaction of any version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxVariant {
    V0(TxVariantV0),
}

impl From<OwnerTx> for TxVariant {
    fn from(tx: OwnerTx) -> Self {
        Self::V0(TxVariantV0::OwnerTx(tx))
    }
}

impl From<MintTx> for TxVariant {
    fn from(tx: MintTx) -> Self {
        Self::V0(TxVariantV0::MintTx(tx))
    }
}

impl From<RewardTx> for TxVariant {
    fn from(tx: RewardTx) -> Self {
        Self::V0(TxVariantV0::RewardTx(tx))
    }
}

impl From<TransferTx> for TxVariant {
    fn from(tx: TransferTx) -> Self {
        Self::V0(TxVariantV0::TransferTx(tx))
    }
}

impl TxVariant {
    pub fn tx_type(&self) -> TxType {
        match self {
            Self::V0(tx) => tx.tx_type(),
        }
    }

    pub fn base(&self) -> &Tx {
        match self {
            Self::V0(tx) => tx.base(),
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.base().timestamp
    }

    pub fn fee(&self) -> &Asset {
        &self.base().fee
    }

    pub fn signature_pairs(&self) -> &[SigPair] {
        &self.base().signature_pairs
    }

    /// Writes the version tag and the transaction. Signatures are appended
    /// only when `include_sigs` is set. Nothing is written on error.
    pub fn serialize(&self, buf: &mut ByteBuffer, include_sigs: bool) -> Result<(), CodecError> {
        buf.write_staged(|buf| match self {
            Self::V0(tx) => {
                buf.write_u16(TX_VERSION_V0);
                tx.serialize(buf, include_sigs)
            }
        })
    }

    /// Serializes into a fresh buffer and returns the written bytes.
    pub fn to_bytes(&self, include_sigs: bool) -> Result<Vec<u8>, CodecError> {
        let mut buf = ByteBuffer::alloc(TX_BUF_CAPACITY);
        self.serialize(&mut buf, include_sigs)?;
        Ok(buf.into_vec())
    }

    /// Reads a transaction, signatures included.
    pub fn deserialize(buf: &mut ByteBuffer) -> Result<Self, CodecError> {
        match buf.read_u16()? {
            TX_VERSION_V0 => Ok(Self::V0(TxVariantV0::deserialize(buf)?)),
            version => {
                debug!(version, "rejecting tx with unknown version");
                Err(CodecError::UnknownTxVersion(version))
            }
        }
    }

    /// Signs the unsigned serialization. The pair is appended to the
    /// signature list when `append` is set, and returned either way.
    pub fn sign(&mut self, key_pair: &KeyPair, append: bool) -> Result<SigPair, CodecError> {
        let msg = self.to_bytes(false)?;
        let pair = key_pair.sign(&msg);
        trace!(signer = %key_pair.public_key, append, "signed tx");
        if append {
            match self {
                Self::V0(tx) => tx.base_mut().signature_pairs.push(pair),
            }
        }
        Ok(pair)
    }

    pub fn calc_txid(&self) -> Result<TxId, CodecError> {
        Ok(TxId(double_sha256(&self.to_bytes(false)?)))
    }

    /// Checks every signature, in list order, against the unsigned form.
    /// A transaction without signatures does not verify.
    pub fn verify_signatures(&self) -> Result<bool, CodecError> {
        let pairs = self.signature_pairs();
        if pairs.is_empty() {
            return Ok(false);
        }
        let msg = self.to_bytes(false)?;
        Ok(pairs.iter().all(|pair| pair.verify(&msg)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
