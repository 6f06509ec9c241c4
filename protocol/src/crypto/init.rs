//! One-time readiness gate for the crypto backend.
//!
//! [`init`] must be awaited once per process before generating keys. It runs
//! a known-answer test against the signature backend and draws from the OS
//! RNG once, so a broken build or sandboxed entropy source fails loudly at
//! startup instead of at the first signature.

use ed25519_dalek::{Signer, SigningKey, Verifier};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

/// Failures raised while bringing up the crypto backend.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("signature backend self test failed: {0}")]
    SelfTest(&'static str),

    #[error("os random number generator unavailable: {0}")]
    Rng(#[from] rand::Error),
}

/// Proof that [`init`] completed. Cheap to copy; required by key generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ready {
    _private: (),
}

// RFC 8032 section 7.1, TEST 1.
const KAT_SEED: [u8; 32] = [
    0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec, 0x2c,
    0xc4, 0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03, 0x1c, 0xae,
    0x7f, 0x60,
];
const KAT_PUBLIC: [u8; 32] = [
    0xd7, 0x5a, 0x98, 0x01, 0x82, 0xb1, 0x0a, 0xb7, 0xd5, 0x4b, 0xfe, 0xd3, 0xc9, 0x64, 0x07,
    0x3a, 0x0e, 0xe1, 0x72, 0xf3, 0xda, 0xa6, 0x23, 0x25, 0xaf, 0x02, 0x1a, 0x68, 0xf7, 0x07,
    0x51, 0x1a,
];

/// Initializes the crypto backend.
///
/// Safe to call more than once; every call repeats the self test.
pub async fn init() -> Result<Ready, InitError> {
    let signing_key = SigningKey::from_bytes(&KAT_SEED);
    let verifying_key = signing_key.verifying_key();
    if verifying_key.to_bytes() != KAT_PUBLIC {
        return Err(InitError::SelfTest("public key derivation mismatch"));
    }

    let signature = signing_key.sign(b"");
    if verifying_key.verify(b"", &signature).is_err() {
        return Err(InitError::SelfTest("signature did not verify"));
    }

    let mut sample = [0u8; 32];
    OsRng.try_fill_bytes(&mut sample)?;

    tracing::info!("crypto backend ready");
    Ok(Ready { _private: () })
}
