// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # MARK Protocol — Core Library
//!
//! The data model and wire protocol of the MARK token ledger: how amounts,
//! keys, scripts, transactions, blocks and RPC messages look in memory and
//! on the wire.
//!
//! Consensus, chain state, storage and sockets are somebody else's problem.
//! Full nodes, wallets and light clients embed this crate to build, sign,
//! transmit and check ledger data; they bring their own transport.
//!
//! ## Architecture
//!
//! Leaves first:
//!
//! - **codec** — Byte cursor and field codecs. Big-endian, zig-zag varints.
//! - **asset** — Fixed-point amounts over arbitrary-precision integers.
//! - **crypto** — Ed25519 keys, double SHA-256, WIF text encoding.
//! - **script** — Authorization scripts and their hashes (addresses).
//! - **tx** — Versioned transactions: owner, mint, reward, transfer.
//! - **block** — Versioned blocks, header hashing, Merkle roots.
//! - **net** — RPC envelope and the request/response catalogue.
//! - **config** — Protocol constants.
//!
//! ## Design Philosophy
//!
//! 1. Exact bytes. Two peers that disagree on one byte cannot verify each
//!    other's signatures.
//! 2. Every decode failure names what it choked on.
//! 3. Closed enums for every tagged thing, so adding a variant is a compile
//!    error everywhere it matters.
//! 4. If it touches money, it has tests. Plural.

pub mod asset;
pub mod block;
pub mod chain;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod net;
pub mod script;
pub mod timestamp;
pub mod tx;

pub use asset::{Asset, AssetError};
pub use block::{Block, BlockHeader};
pub use codec::{ByteBuffer, CodecError};
pub use crypto::{KeyPair, PublicKey, ScriptHash, SigPair};
pub use net::{Body, Msg};
pub use script::{Script, ScriptBuilder};
pub use timestamp::{Timestamp, TimestampError};
pub use tx::{TxVariant, TxVerifyError};
