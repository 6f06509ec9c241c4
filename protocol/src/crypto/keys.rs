//! # Key Management
//!
//! Ed25519 keys, detached signatures and the `SigPair` that carries a
//! signature alongside the key that produced it.
//!
//! A private key is stored in its expanded 64-byte form (seed followed by the
//! public key) together with the 32-byte seed. The seed is what the private
//! WIF carries: `KeyPair::from_wif` re-derives everything else from it, so a
//! WIF exported here imports byte-for-byte anywhere else that speaks MARK.
//!
//! ## Security considerations
//!
//! - Key equality is constant-time (`subtle`). Comparing secret material with
//!   `==` on slices short-circuits on the first differing byte.
//! - `Debug` never prints private key bytes.
//! - Key generation requires a [`Ready`] token from [`crate::crypto::init`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::ConstantTimeEq;

use super::init::Ready;
use super::wif::{self, WifError};
use crate::config::{
    PRIV_BUF_PREFIX, PUBLIC_KEY_LENGTH, PUB_BUF_PREFIX, SECRET_KEY_LENGTH, SEED_LENGTH,
    SIGNATURE_LENGTH,
};
use crate::script::{Script, ScriptBuilder};

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

/// Expanded Ed25519 secret key plus the seed it was derived from.
#[derive(Clone)]
pub struct PrivateKey {
    secret: [u8; SECRET_KEY_LENGTH],
    seed: [u8; SEED_LENGTH],
}

impl PrivateKey {
    /// Builds a private key from raw material, validating both lengths.
    ///
    /// `secret` must be the expanded form of `seed`: equality compares the
    /// secret while signing uses the seed, so the two may not disagree.
    pub fn new(secret: &[u8], seed: &[u8]) -> Result<Self, WifError> {
        let secret: [u8; SECRET_KEY_LENGTH] = secret.try_into().map_err(|_| {
            WifError::new(format!("invalid key length (got {} bytes)", secret.len()))
        })?;
        let seed: [u8; SEED_LENGTH] = seed.try_into().map_err(|_| {
            WifError::new(format!("invalid seed length (got {} bytes)", seed.len()))
        })?;
        let expected = SigningKey::from_bytes(&seed).to_keypair_bytes();
        if !bool::from(expected.ct_eq(&secret)) {
            return Err(WifError::new("secret key does not match seed"));
        }
        Ok(Self { secret, seed })
    }

    fn from_signing_key(signing_key: &SigningKey) -> Self {
        Self {
            secret: signing_key.to_keypair_bytes(),
            seed: signing_key.to_bytes(),
        }
    }

    pub fn seed(&self) -> &[u8; SEED_LENGTH] {
        &self.seed
    }

    /// Expanded form: seed followed by the public key.
    pub fn secret_bytes(&self) -> &[u8; SECRET_KEY_LENGTH] {
        &self.secret
    }

    /// Private WIF. Encodes the seed, never the expanded key, and carries no
    /// address tag.
    pub fn to_wif(&self) -> String {
        wif::encode(PRIV_BUF_PREFIX, &self.seed, false)
    }

    fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.seed)
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.secret.ct_eq(&other.secret).into()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// Raw 32-byte Ed25519 public key.
///
/// Only the length is validated on construction. A key that is not a valid
/// curve point simply never verifies anything.
#[derive(Clone, Copy)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WifError> {
        let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            WifError::new(format!("invalid key length (got {} bytes)", bytes.len()))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    pub fn to_wif(&self) -> String {
        wif::encode(PUB_BUF_PREFIX, &self.0, true)
    }

    pub fn from_wif(wif_str: &str) -> Result<Self, WifError> {
        let bytes = wif::decode(wif_str, PUB_BUF_PREFIX, true)?;
        Self::from_bytes(&bytes)
    }

    /// The default single-signature script for this key.
    pub fn to_script(&self) -> Script {
        ScriptBuilder::single_sig(self)
    }

    /// Verifies a detached signature over `msg`.
    pub fn verify(&self, signature: &Signature, msg: &[u8]) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let sig = DalekSignature::from_bytes(&signature.0);
        verifying_key.verify(msg, &sig).is_ok()
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for PublicKey {}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wif())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_wif())
    }
}

impl FromStr for PublicKey {
    type Err = WifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wif(s)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wif())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_wif(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Signature / SigPair
// ---------------------------------------------------------------------------

/// Detached 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WifError> {
        let bytes: [u8; SIGNATURE_LENGTH] = bytes.try_into().map_err(|_| {
            WifError::new(format!(
                "invalid signature length (got {} bytes)",
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", &self.to_hex()[..16])
    }
}

/// A public key and the signature it produced. Travels with the data it
/// authorizes; the message itself is never stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigPair {
    pub public_key: PublicKey,
    pub signature: Signature,
}

impl SigPair {
    pub fn verify(&self, msg: &[u8]) -> bool {
        self.public_key.verify(&self.signature, msg)
    }
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// A signing identity.
///
/// # Examples
///
/// ```
/// use mark_protocol::crypto::KeyPair;
///
/// let kp = KeyPair::from_seed(&[7u8; 32]).unwrap();
/// let pair = kp.sign(b"send 100 MARK");
/// assert!(pair.verify(b"send 100 MARK"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Derives a keypair deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self, WifError> {
        let seed: [u8; SEED_LENGTH] = seed.try_into().map_err(|_| {
            WifError::new(format!("invalid seed length (got {} bytes)", seed.len()))
        })?;
        let signing_key = SigningKey::from_bytes(&seed);
        Ok(Self {
            private_key: PrivateKey::from_signing_key(&signing_key),
            public_key: PublicKey(signing_key.verifying_key().to_bytes()),
        })
    }

    /// Imports a private WIF and re-derives the public half.
    pub fn from_wif(wif_str: &str) -> Result<Self, WifError> {
        let seed = wif::decode(wif_str, PRIV_BUF_PREFIX, false)?;
        Self::from_seed(&seed)
    }

    pub fn sign(&self, msg: &[u8]) -> SigPair {
        let signature = self.private_key.signing_key().sign(msg);
        SigPair {
            public_key: self.public_key,
            signature: Signature(signature.to_bytes()),
        }
    }

    pub fn verify(&self, signature: &Signature, msg: &[u8]) -> bool {
        self.public_key.verify(signature, msg)
    }
}

/// Draws a fresh seed from the OS RNG and derives a keypair from it.
///
/// Takes the [`Ready`] token so that key generation cannot be reached before
/// the crypto backend has been initialized.
pub fn generate_keypair(_ready: &Ready) -> KeyPair {
    let mut seed = [0u8; SEED_LENGTH];
    OsRng.fill_bytes(&mut seed);
    let signing_key = SigningKey::from_bytes(&seed);
    KeyPair {
        private_key: PrivateKey::from_signing_key(&signing_key),
        public_key: PublicKey(signing_key.verifying_key().to_bytes()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Operand;

    const PRIV_WIF: &str = "3GAD3otqozDorfu1iDpMQJ1gzWp8PRFEjVHZivZdedKW3i3KtM";
    const PUB_WIF: &str = "GOD52QZDBUStV5CudxvKf6bPsQeN7oeKTkEm2nAU1vAUqNVexGTb8";

    #[test]
    fn known_wif_vector() {
        let kp = KeyPair::from_wif(PRIV_WIF).unwrap();
        assert_eq!(kp.public_key.to_wif(), PUB_WIF);
        assert_eq!(kp.private_key.to_wif(), PRIV_WIF);
        assert_eq!(PublicKey::from_wif(PUB_WIF).unwrap(), kp.public_key);
    }

    #[test]
    fn expanded_secret_is_seed_then_public_key() {
        let kp = KeyPair::from_seed(&[42u8; 32]).unwrap();
        let secret = kp.private_key.secret_bytes();
        assert_eq!(&secret[..32], kp.private_key.seed());
        assert_eq!(&secret[32..], kp.public_key.as_bytes());
    }

    #[test]
    fn sign_and_verify() {
        let kp = KeyPair::from_seed(&[1u8; 32]).unwrap();
        let other = KeyPair::from_seed(&[2u8; 32]).unwrap();
        let msg = b"Hello world";

        let pair = kp.sign(msg);
        assert!(kp.verify(&pair.signature, msg));
        assert!(pair.verify(msg));
        assert!(!other.verify(&pair.signature, msg));
        assert!(!pair.verify(b"Hello w0rld"));
    }

    #[test]
    fn signing_is_deterministic() {
        let kp = KeyPair::from_seed(&[3u8; 32]).unwrap();
        assert_eq!(kp.sign(b"abc"), kp.sign(b"abc"));
    }

    #[test]
    fn private_key_length_validation() {
        let err = PrivateKey::new(&[0u8; 63], &[0u8; 32]).unwrap_err();
        assert_eq!(err.reason, "invalid key length (got 63 bytes)");
        let err = PrivateKey::new(&[0u8; 64], &[0u8; 31]).unwrap_err();
        assert_eq!(err.reason, "invalid seed length (got 31 bytes)");
    }

    #[test]
    fn private_key_secret_must_match_seed() {
        let kp = KeyPair::from_seed(&[3u8; 32]).unwrap();
        let secret = kp.private_key.secret_bytes();
        let seed = kp.private_key.seed();
        assert_eq!(PrivateKey::new(secret, seed).unwrap(), kp.private_key);

        let err = PrivateKey::new(&[0u8; 64], &[0u8; 32]).unwrap_err();
        assert_eq!(err.reason, "secret key does not match seed");

        // Same seed, foreign public half.
        let other = KeyPair::from_seed(&[4u8; 32]).unwrap();
        let mut mixed = *secret;
        mixed[32..].copy_from_slice(other.public_key.as_bytes());
        assert!(PrivateKey::new(&mixed, seed).is_err());
    }

    #[test]
    fn public_key_length_validation() {
        let err = PublicKey::from_bytes(&[0u8; 33]).unwrap_err();
        assert_eq!(err.reason, "invalid key length (got 33 bytes)");
    }

    #[test]
    fn public_wif_rejects_private_wif() {
        // Private WIFs carry no address tag.
        let err = PublicKey::from_wif(PRIV_WIF).unwrap_err();
        assert_eq!(err.reason, "wif must start with GOD");

        let tagged = format!("GOD{PRIV_WIF}");
        let err = PublicKey::from_wif(&tagged).unwrap_err();
        assert_eq!(err.reason, "invalid prefix");
    }

    #[test]
    fn private_wif_rejects_public_payload() {
        let err = KeyPair::from_wif(&PUB_WIF[3..]).unwrap_err();
        assert_eq!(err.reason, "invalid prefix");
    }

    #[test]
    fn default_script_matches_builder() {
        let kp = KeyPair::from_seed(&[5u8; 32]).unwrap();
        let mut builder = ScriptBuilder::new();
        builder.push_pubkey(&kp.public_key).unwrap();
        builder.push(Operand::OpCheckSig).unwrap();
        assert_eq!(kp.public_key.to_script(), builder.build().unwrap());
    }

    #[test]
    fn default_script_layout() {
        let kp = KeyPair::from_seed(&[5u8; 32]).unwrap();
        let script = kp.public_key.to_script();
        let bytes = script.as_bytes();
        assert_eq!(bytes.len(), 34);
        assert_eq!(bytes[0], Operand::PushPubKey as u8);
        assert_eq!(&bytes[1..33], kp.public_key.as_bytes());
        assert_eq!(bytes[33], Operand::OpCheckSig as u8);
    }

    #[test]
    fn invalid_point_never_verifies() {
        let kp = KeyPair::from_seed(&[6u8; 32]).unwrap();
        let pair = kp.sign(b"msg");
        let bogus = PublicKey::from_bytes(&[0xffu8; 32]).unwrap();
        assert!(!bogus.verify(&pair.signature, b"msg"));
    }

    #[test]
    fn public_key_serde_uses_wif() {
        let pk = PublicKey::from_wif(PUB_WIF).unwrap();
        let json = serde_json::to_string(&pk).unwrap();
        assert_eq!(json, format!("\"{PUB_WIF}\""));
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pk);
    }

    #[test]
    fn debug_hides_private_key() {
        let kp = KeyPair::from_seed(&[8u8; 32]).unwrap();
        let dbg = format!("{:?}", kp.private_key);
        assert_eq!(dbg, "PrivateKey(..)");
    }
}
