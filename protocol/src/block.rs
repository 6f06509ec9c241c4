//! # Blocks
//!
//! A block is a versioned header, the minter's signature over the header
//! hash, and an ordered list of transactions.
//!
//! ## Wire format
//!
//! ```text
//! header
//!   version          u16     always 0 today
//!   previous_hash    32
//!   height           u64
//!   timestamp        u64
//!   tx_merkle_root   32
//! body
//!   signer           96      public key || signature
//!   tx_count         u32
//!   txs              ...     each with its signatures
//! ```
//!
//! The block hash is the double SHA-256 of the header serialization alone, so
//! headers can be chained and verified without the body. The body is bound to
//! the header through `tx_merkle_root`.

use tracing::{debug, trace};

use crate::codec::types::{read_digest, read_sig_pair, write_digest, write_sig_pair};
use crate::codec::{ByteBuffer, CodecError};
use crate::config::{BLOCK_BUF_CAPACITY, BLOCK_VERSION_V0, HEADER_BUF_CAPACITY};
use crate::crypto::{double_sha256, Digest, KeyPair, SigPair};
use crate::timestamp::Timestamp;
use crate::tx::TxVariant;

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeaderV0 {
    pub previous_hash: Digest,
    pub height: u64,
    pub timestamp: Timestamp,
    pub tx_merkle_root: Digest,
}

/// A block header of any version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockHeader {
    V0(BlockHeaderV0),
}

impl BlockHeader {
    pub fn previous_hash(&self) -> &Digest {
        match self {
            Self::V0(h) => &h.previous_hash,
        }
    }

    pub fn height(&self) -> u64 {
        match self {
            Self::V0(h) => h.height,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::V0(h) => h.timestamp,
        }
    }

    pub fn tx_merkle_root(&self) -> &Digest {
        match self {
            Self::V0(h) => &h.tx_merkle_root,
        }
    }

    /// Version tag followed by the header fields.
    pub fn serialize(&self, buf: &mut ByteBuffer) {
        match self {
            Self::V0(h) => {
                buf.write_u16(BLOCK_VERSION_V0);
                write_digest(buf, &h.previous_hash);
                buf.write_u64(h.height);
                buf.write_u64(h.timestamp.as_millis());
                write_digest(buf, &h.tx_merkle_root);
            }
        }
    }

    pub fn deserialize(buf: &mut ByteBuffer) -> Result<Self, CodecError> {
        match buf.read_u16()? {
            BLOCK_VERSION_V0 => Ok(Self::V0(BlockHeaderV0 {
                previous_hash: read_digest(buf)?,
                height: buf.read_u64()?,
                timestamp: Timestamp::from_millis(buf.read_u64()?),
                tx_merkle_root: read_digest(buf)?,
            })),
            version => {
                debug!(version, "rejecting block with unknown version");
                Err(CodecError::UnknownBlockVersion(version))
            }
        }
    }

    /// Double SHA-256 of the header serialization.
    pub fn calc_hash(&self) -> Digest {
        let mut buf = ByteBuffer::alloc(HEADER_BUF_CAPACITY);
        self.serialize(&mut buf);
        double_sha256(buf.shared_view())
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockV0 {
    pub header: BlockHeaderV0,
    /// `None` until the block is signed. Unsigned blocks cannot be
    /// serialized.
    pub signer: Option<SigPair>,
    pub transactions: Vec<TxVariant>,
}

/// A block of any version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    V0(BlockV0),
}

impl Block {
    /// Builds an unsigned block, computing the Merkle root from `transactions`.
    pub fn new(
        previous_hash: Digest,
        height: u64,
        timestamp: impl Into<Timestamp>,
        transactions: Vec<TxVariant>,
    ) -> Result<Self, CodecError> {
        let tx_merkle_root = calc_tx_merkle_root(&transactions)?;
        Ok(Self::V0(BlockV0 {
            header: BlockHeaderV0 {
                previous_hash,
                height,
                timestamp: timestamp.into(),
                tx_merkle_root,
            },
            signer: None,
            transactions,
        }))
    }

    /// An unsigned block at `height + 1` linked to this block's hash.
    pub fn new_child(
        &self,
        transactions: Vec<TxVariant>,
        timestamp: impl Into<Timestamp>,
    ) -> Result<Self, CodecError> {
        let height = self
            .height()
            .checked_add(1)
            .ok_or(CodecError::HeightOverflow(self.height()))?;
        Self::new(self.calc_hash(), height, timestamp, transactions)
    }

    /// A copy of the header with the version tag.
    pub fn header(&self) -> BlockHeader {
        match self {
            Self::V0(b) => BlockHeader::V0(b.header.clone()),
        }
    }

    pub fn height(&self) -> u64 {
        match self {
            Self::V0(b) => b.header.height,
        }
    }

    pub fn signer(&self) -> Option<&SigPair> {
        match self {
            Self::V0(b) => b.signer.as_ref(),
        }
    }

    pub fn transactions(&self) -> &[TxVariant] {
        match self {
            Self::V0(b) => &b.transactions,
        }
    }

    pub fn calc_hash(&self) -> Digest {
        self.header().calc_hash()
    }

    /// Signs the header hash and installs the signer, replacing any earlier
    /// one.
    pub fn sign(&mut self, key_pair: &KeyPair) -> SigPair {
        let hash = self.calc_hash();
        let pair = key_pair.sign(hash.as_bytes());
        trace!(height = self.height(), signer = %key_pair.public_key, "signed block");
        match self {
            Self::V0(b) => b.signer = Some(pair),
        }
        pair
    }

    /// True when this block's `previous_hash` is exactly `prev`'s hash.
    pub fn verify_hash(&self, prev: &Block) -> bool {
        match self {
            Self::V0(b) => b.header.previous_hash == prev.calc_hash(),
        }
    }

    /// True when the header's Merkle root matches the transaction list.
    pub fn verify_tx_merkle_root(&self) -> Result<bool, CodecError> {
        match self {
            Self::V0(b) => Ok(b.header.tx_merkle_root == calc_tx_merkle_root(&b.transactions)?),
        }
    }

    /// True when a signer is set and its signature covers the header hash.
    pub fn verify_signer(&self) -> bool {
        let hash = self.calc_hash();
        self.signer()
            .is_some_and(|pair| pair.verify(hash.as_bytes()))
    }

    /// Header, then signer, transaction count and transactions.
    pub fn serialize(&self, buf: &mut ByteBuffer) -> Result<(), CodecError> {
        match self {
            Self::V0(b) => {
                let signer = b.signer.as_ref().ok_or(CodecError::UnsignedBlock)?;
                self.header().serialize(buf);
                write_sig_pair(buf, signer);

                let count = u32::try_from(b.transactions.len())
                    .map_err(|_| CodecError::BufferTooLarge(b.transactions.len()))?;
                buf.write_u32(count);
                for tx in &b.transactions {
                    tx.serialize(buf, true)?;
                }
                Ok(())
            }
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut buf = ByteBuffer::alloc(BLOCK_BUF_CAPACITY);
        self.serialize(&mut buf)?;
        Ok(buf.into_vec())
    }

    pub fn deserialize(buf: &mut ByteBuffer) -> Result<Self, CodecError> {
        match BlockHeader::deserialize(buf)? {
            BlockHeader::V0(header) => {
                let signer = read_sig_pair(buf)?;
                let count = buf.read_u32()?;
                let transactions = (0..count)
                    .map(|_| TxVariant::deserialize(buf))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::V0(BlockV0 {
                    header,
                    signer: Some(signer),
                    transactions,
                }))
            }
        }
    }
}

/// Merkle root over transaction ids.
///
/// Each level pairs adjacent nodes and hashes their concatenation with double
/// SHA-256; an odd node out is paired with itself. An empty list yields the
/// double SHA-256 of the empty string.
pub fn calc_tx_merkle_root(transactions: &[TxVariant]) -> Result<Digest, CodecError> {
    let mut level = transactions
        .iter()
        .map(|tx| tx.calc_txid().map(|id| id.0))
        .collect::<Result<Vec<_>, _>>()?;
    if level.is_empty() {
        return Ok(double_sha256(&[]));
    }

    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                let mut joined = [0u8; 64];
                joined[..32].copy_from_slice(left.as_bytes());
                joined[32..].copy_from_slice(right.as_bytes());
                double_sha256(&joined)
            })
            .collect();
    }
    Ok(level[0])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Asset;
    use crate::tx::{RewardTx, Tx};

    fn reward(n: i64) -> TxVariant {
        RewardTx {
            base: Tx::new(1_000u64, Asset::zero()),
            to: crate::crypto::ScriptHash(double_sha256(&n.to_be_bytes())),
            rewards: Asset::new(n),
        }
        .into()
    }

    fn genesis(kp: &KeyPair) -> Block {
        let mut block = Block::new(Digest::default(), 0, 1_000u64, vec![reward(1)]).unwrap();
        block.sign(kp);
        block
    }

    #[test]
    fn unsigned_block_cannot_serialize() {
        let block = Block::new(Digest::default(), 0, 1u64, vec![]).unwrap();
        let err = block.to_bytes().unwrap_err();
        assert_eq!(err, CodecError::UnsignedBlock);
        assert_eq!(err.to_string(), "block must be signed to serialize");
    }

    #[test]
    fn signed_block_round_trip() {
        let kp = KeyPair::from_seed(&[1u8; 32]).unwrap();
        let block = genesis(&kp);
        let bytes = block.to_bytes().unwrap();

        let mut buf = ByteBuffer::from(bytes);
        let back = Block::deserialize(&mut buf).unwrap();
        assert_eq!(back, block);
        assert_eq!(buf.remaining(), 0);
        assert!(back.verify_signer());
    }

    #[test]
    fn header_round_trip_and_size() {
        let kp = KeyPair::from_seed(&[1u8; 32]).unwrap();
        let header = genesis(&kp).header();
        let mut buf = ByteBuffer::alloc(0);
        header.serialize(&mut buf);
        assert_eq!(buf.offset(), 2 + 32 + 8 + 8 + 32);

        buf.reset_offset();
        assert_eq!(BlockHeader::deserialize(&mut buf).unwrap(), header);
    }

    #[test]
    fn hash_covers_header_only() {
        let kp = KeyPair::from_seed(&[1u8; 32]).unwrap();
        let block = genesis(&kp);
        let mut buf = ByteBuffer::alloc(0);
        block.header().serialize(&mut buf);
        assert_eq!(block.calc_hash(), double_sha256(buf.shared_view()));

        let mut resigned = block.clone();
        resigned.sign(&KeyPair::from_seed(&[2u8; 32]).unwrap());
        assert_eq!(resigned.calc_hash(), block.calc_hash());
    }

    #[test]
    fn child_links_to_parent() {
        let kp = KeyPair::from_seed(&[1u8; 32]).unwrap();
        let parent = genesis(&kp);
        let mut child = parent.new_child(vec![reward(2), reward(3)], 2_000u64).unwrap();
        child.sign(&kp);

        assert_eq!(child.height(), 1);
        assert!(child.verify_hash(&parent));
        assert!(!parent.verify_hash(&child));
        assert!(child.verify_tx_merkle_root().unwrap());
    }

    #[test]
    fn no_child_past_max_height() {
        let tip = Block::new(Digest::default(), u64::MAX, 1u64, vec![]).unwrap();
        assert_eq!(
            tip.new_child(vec![], 2u64),
            Err(CodecError::HeightOverflow(u64::MAX))
        );

        let below = Block::new(Digest::default(), u64::MAX - 1, 1u64, vec![]).unwrap();
        assert_eq!(below.new_child(vec![], 2u64).unwrap().height(), u64::MAX);
    }

    #[test]
    fn merkle_root_detects_tampering() {
        let kp = KeyPair::from_seed(&[1u8; 32]).unwrap();
        let mut block = genesis(&kp);
        match &mut block {
            Block::V0(b) => b.transactions.push(reward(9)),
        }
        assert!(!block.verify_tx_merkle_root().unwrap());
    }

    #[test]
    fn merkle_root_shapes() {
        assert_eq!(calc_tx_merkle_root(&[]).unwrap(), double_sha256(&[]));

        let one = reward(1);
        assert_eq!(
            calc_tx_merkle_root(&[one.clone()]).unwrap(),
            one.calc_txid().unwrap().0
        );

        let (a, b, c) = (reward(1), reward(2), reward(3));
        let id = |tx: &TxVariant| tx.calc_txid().unwrap().0;
        let join = |l: &Digest, r: &Digest| {
            let mut v = l.as_bytes().to_vec();
            v.extend_from_slice(r.as_bytes());
            double_sha256(&v)
        };
        let ab = join(&id(&a), &id(&b));
        let cc = join(&id(&c), &id(&c));
        assert_eq!(
            calc_tx_merkle_root(&[a, b, c]).unwrap(),
            join(&ab, &cc)
        );
    }

    #[test]
    fn signer_must_match_header() {
        let kp = KeyPair::from_seed(&[1u8; 32]).unwrap();
        let mut block = genesis(&kp);
        match &mut block {
            Block::V0(b) => b.header.height = 7,
        }
        assert!(!block.verify_signer());

        let unsigned = Block::new(Digest::default(), 0, 1u64, vec![]).unwrap();
        assert!(!unsigned.verify_signer());
    }

    #[test]
    fn unknown_version() {
        let mut buf = ByteBuffer::from(vec![0xff, 0xff]);
        let err = Block::deserialize(&mut buf).unwrap_err();
        assert_eq!(err.to_string(), "unknown block version: 65535");
    }
}
