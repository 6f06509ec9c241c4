//! # Wallet Import Format
//!
//! Checksummed base58 text form for private keys, public keys and script
//! hashes:
//!
//! ```text
//! [GOD] base58( prefix(1) || payload || checksum(4) )
//! ```
//!
//! The checksum is the first four bytes of the double SHA-256 of
//! `prefix || payload`. The `GOD` tag is only used for public material
//! (public keys and script hashes), so a private key can never be pasted
//! where an address is expected without the parser noticing.

use subtle::ConstantTimeEq;
use thiserror::Error;

use super::hash::double_sha256;
use crate::config::{PUB_ADDRESS_PREFIX, WIF_CHECKSUM_LENGTH};

/// The "invalid WIF" error class. The reason is human-readable and names the
/// first check that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid wif: {reason}")]
pub struct WifError {
    pub reason: String,
}

impl WifError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Encodes `payload` with the given prefix byte, optionally prepending the
/// public address tag.
pub(crate) fn encode(prefix: u8, payload: &[u8], tagged: bool) -> String {
    let mut raw = Vec::with_capacity(1 + payload.len() + WIF_CHECKSUM_LENGTH);
    raw.push(prefix);
    raw.extend_from_slice(payload);

    let checksum = double_sha256(&raw);
    raw.extend_from_slice(&checksum.as_bytes()[..WIF_CHECKSUM_LENGTH]);

    let body = bs58::encode(raw).into_string();
    if tagged {
        format!("{PUB_ADDRESS_PREFIX}{body}")
    } else {
        body
    }
}

/// Reverses [`encode`], returning the payload bytes.
///
/// Checks run in a fixed order: presence, address tag, base58 alphabet,
/// prefix byte, checksum. Payload length is left to the caller, which knows
/// what kind of key it expects.
pub(crate) fn decode(wif: &str, prefix: u8, tagged: bool) -> Result<Vec<u8>, WifError> {
    let body = if tagged {
        wif.strip_prefix(PUB_ADDRESS_PREFIX).ok_or_else(|| {
            WifError::new(format!("wif must start with {PUB_ADDRESS_PREFIX}"))
        })?
    } else {
        wif
    };
    if body.is_empty() {
        return Err(WifError::new("wif not provided"));
    }

    let raw = bs58::decode(body)
        .into_vec()
        .map_err(|e| WifError::new(format!("invalid base58: {e}")))?;

    if raw.first() != Some(&prefix) {
        return Err(WifError::new("invalid prefix"));
    }
    if raw.len() < 1 + WIF_CHECKSUM_LENGTH {
        return Err(WifError::new("invalid checksum"));
    }

    let (key, checksum) = raw.split_at(raw.len() - WIF_CHECKSUM_LENGTH);
    let expected = double_sha256(key);
    let valid: bool = expected.as_bytes()[..WIF_CHECKSUM_LENGTH]
        .ct_eq(checksum)
        .into();
    if !valid {
        return Err(WifError::new("invalid checksum"));
    }

    Ok(key[1..].to_vec())
}
