//! # Cryptographic Identity for MARK
//!
//! Everything that touches keys, signatures or hashes goes through here:
//!
//! - **Ed25519** for signatures, derived from a 32-byte seed.
//! - **Double SHA-256** for every commitment: WIF checksums, script hashes,
//!   transaction ids, Merkle nodes and block hashes.
//! - **WIF** as the text form of keys and addresses.
//!
//! ## Lifecycle
//!
//! Await [`init`] once at startup. It returns a [`Ready`] token, and key
//! generation takes that token as an argument. Hashing, signing with an
//! existing key and verification are plain synchronous calls.
//!
//! Nothing here is hand-rolled: the primitives come from `ed25519-dalek`,
//! `sha2` and `bs58`. This module only fixes how MARK lays bytes out.

pub mod address;
pub mod hash;
pub mod init;
pub mod keys;
pub mod wif;

pub use address::ScriptHash;
pub use hash::{double_sha256, sha256, Digest};
pub use init::{init, InitError, Ready};
pub use keys::{generate_keypair, KeyPair, PrivateKey, PublicKey, SigPair, Signature};
pub use wif::WifError;
