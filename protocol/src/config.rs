//! # Protocol Configuration & Constants
//!
//! Every magic number in MARK lives here. If you're hardcoding a constant
//! somewhere else, you're doing it wrong.
//!
//! These values are part of the wire format and the text encodings. Two
//! peers that disagree on any of them cannot validate each other's
//! signatures, so changing one is a hard fork in all but name.

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// Ticker of the native token. Part of the canonical asset text form.
pub const ASSET_SYMBOL: &str = "MARK";

/// Number of fractional decimal digits every asset amount is scaled by.
pub const MAX_PRECISION: u32 = 5;

/// Longest asset string accepted by the parser, symbol included.
pub const MAX_ASSET_STR_LEN: usize = 26;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 seed length in bytes. The seed is what a private WIF carries.
pub const SEED_LENGTH: usize = 32;

/// Expanded Ed25519 secret key length: seed followed by the public key.
pub const SECRET_KEY_LENGTH: usize = 64;

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Detached Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Output length of the double SHA-256 digest.
pub const DIGEST_LENGTH: usize = 32;

/// Number of checksum bytes appended to a WIF payload before base58.
pub const WIF_CHECKSUM_LENGTH: usize = 4;

// ---------------------------------------------------------------------------
// Text Encodings
// ---------------------------------------------------------------------------

/// Prefix byte of a private key WIF payload.
pub const PRIV_BUF_PREFIX: u8 = 0x01;

/// Prefix byte of a public key WIF payload.
pub const PUB_BUF_PREFIX: u8 = 0x02;

/// Prefix byte of a script hash WIF payload.
pub const SCRIPT_HASH_BUF_PREFIX: u8 = 0x03;

/// Human-readable tag prepended to public key and script hash WIFs.
/// Private keys never carry it, so the two can't be confused at a glance.
pub const PUB_ADDRESS_PREFIX: &str = "GOD";

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// Hard cap on the size of an authorization script.
pub const MAX_SCRIPT_BYTE_SIZE: usize = 2048;

// ---------------------------------------------------------------------------
// Versioning
// ---------------------------------------------------------------------------

/// The only transaction version currently defined.
pub const TX_VERSION_V0: u16 = 0;

/// The only block version currently defined.
pub const BLOCK_VERSION_V0: u16 = 0;

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Message id reserved for out-of-band IO failures.
///
/// A peer that receives a request carrying this id answers with an IO error
/// regardless of whether the request itself is valid.
pub const IO_ERROR_MSG_ID: u32 = u32::MAX;

// ---------------------------------------------------------------------------
// Serialization Buffers
// ---------------------------------------------------------------------------

/// Initial capacity used when a transaction is serialized into a fresh buffer.
pub const TX_BUF_CAPACITY: usize = 8192;

/// Initial capacity used when a block is serialized into a fresh buffer.
pub const BLOCK_BUF_CAPACITY: usize = 1_048_576;

/// Initial capacity used when a block header is serialized for hashing.
pub const HEADER_BUF_CAPACITY: usize = 256;
