//! # Hashing Utilities
//!
//! MARK uses exactly one hash construction: SHA-256 applied twice,
//! `SHA-256(SHA-256(m))`. It produces WIF checksums, script hashes (account
//! addresses), transaction ids, Merkle nodes and block hashes.
//!
//! The single-round `sha256` is exposed for completeness, but nothing on the
//! wire is ever committed to with a single round.

use std::fmt;

use sha2::{Digest as _, Sha256};

use crate::codec::CodecError;
use crate::config::DIGEST_LENGTH;

/// A 32-byte double SHA-256 output.
///
/// Always exactly [`DIGEST_LENGTH`] bytes; the type makes a short or long
/// digest unrepresentable once constructed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Digest([u8; DIGEST_LENGTH]);

impl Digest {
    pub const fn new(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Builds a digest from a slice, failing unless it is exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        let array: [u8; DIGEST_LENGTH] = bytes
            .try_into()
            .map_err(|_| CodecError::DigestLength(bytes.len()))?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Single-round SHA-256.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// `SHA-256(SHA-256(data))`.
///
/// # Example
///
/// ```
/// use mark_protocol::crypto::double_sha256;
///
/// let id = double_sha256(b"raw transaction bytes");
/// assert_eq!(id.as_bytes().len(), 32);
/// ```
pub fn double_sha256(data: &[u8]) -> Digest {
    Digest(sha256(&sha256(data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        // NIST test vector for "abc".
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn double_sha256_of_empty_input() {
        assert_eq!(
            double_sha256(b"").to_hex(),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn double_hash_is_hash_of_hash() {
        let data = b"MARK";
        assert_eq!(double_sha256(data).as_bytes(), &sha256(&sha256(data)));
        assert_ne!(double_sha256(data).as_bytes(), &sha256(data));
    }

    #[test]
    fn digest_from_slice_checks_length() {
        assert!(Digest::from_slice(&[0u8; 32]).is_ok());
        assert_eq!(
            Digest::from_slice(&[0u8; 31]),
            Err(CodecError::DigestLength(31))
        );
        assert_eq!(
            Digest::from_slice(&[0u8; 33]),
            Err(CodecError::DigestLength(33))
        );
    }
}
