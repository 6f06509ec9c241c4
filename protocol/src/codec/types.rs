//! Composable field codecs layered on [`ByteBuffer`].
//!
//! Each `write_*` has a matching `read_*`. Fixed-size fields (digests, keys,
//! signatures) are written raw; variable-size ones (buffers, strings,
//! scripts) carry a big-endian `u32` length prefix.

use num_traits::ToPrimitive;

use super::{ByteBuffer, CodecError};
use crate::asset::Asset;
use crate::config::{DIGEST_LENGTH, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::crypto::{Digest, PublicKey, ScriptHash, SigPair, Signature};
use crate::script::Script;

fn write_len(buf: &mut ByteBuffer, len: usize) -> Result<(), CodecError> {
    let len = u32::try_from(len).map_err(|_| CodecError::BufferTooLarge(len))?;
    buf.write_u32(len);
    Ok(())
}

/// `u32` length prefix followed by raw bytes.
pub fn write_buffer(buf: &mut ByteBuffer, value: &[u8]) -> Result<(), CodecError> {
    write_len(buf, value.len())?;
    buf.write_bytes(value);
    Ok(())
}

pub fn read_buffer(buf: &mut ByteBuffer) -> Result<Vec<u8>, CodecError> {
    let len = buf.read_u32()? as usize;
    buf.read_bytes(len)
}

pub fn write_digest(buf: &mut ByteBuffer, value: &Digest) {
    buf.write_bytes(value.as_bytes());
}

pub fn read_digest(buf: &mut ByteBuffer) -> Result<Digest, CodecError> {
    Digest::from_slice(&buf.read_bytes(DIGEST_LENGTH)?)
}

/// Length-prefixed UTF-8. The prefix counts bytes, not characters.
pub fn write_string(buf: &mut ByteBuffer, value: &str) -> Result<(), CodecError> {
    write_len(buf, value.len())?;
    buf.write_utf8_string(value);
    Ok(())
}

pub fn read_string(buf: &mut ByteBuffer) -> Result<String, CodecError> {
    let len = buf.read_u32()? as usize;
    buf.read_utf8_string(len)
}

pub fn write_public_key(buf: &mut ByteBuffer, value: &PublicKey) {
    buf.write_bytes(value.as_bytes());
}

pub fn read_public_key(buf: &mut ByteBuffer) -> Result<PublicKey, CodecError> {
    Ok(PublicKey::from_bytes(&buf.read_bytes(PUBLIC_KEY_LENGTH)?)?)
}

/// Public key (32 bytes) then signature (64 bytes).
pub fn write_sig_pair(buf: &mut ByteBuffer, value: &SigPair) {
    write_public_key(buf, &value.public_key);
    buf.write_bytes(value.signature.as_bytes());
}

pub fn read_sig_pair(buf: &mut ByteBuffer) -> Result<SigPair, CodecError> {
    let public_key = read_public_key(buf)?;
    let signature = Signature::from_bytes(&buf.read_bytes(SIGNATURE_LENGTH)?)?;
    Ok(SigPair {
        public_key,
        signature,
    })
}

/// Single-byte count followed by that many sig pairs.
pub fn write_sig_pairs(buf: &mut ByteBuffer, pairs: &[SigPair]) -> Result<(), CodecError> {
    let count = u8::try_from(pairs.len()).map_err(|_| CodecError::TooManyItems {
        what: "signatures",
        len: pairs.len(),
    })?;
    buf.write_u8(count);
    for pair in pairs {
        write_sig_pair(buf, pair);
    }
    Ok(())
}

pub fn read_sig_pairs(buf: &mut ByteBuffer) -> Result<Vec<SigPair>, CodecError> {
    let count = buf.read_u8()?;
    (0..count).map(|_| read_sig_pair(buf)).collect()
}

pub fn write_script(buf: &mut ByteBuffer, value: &Script) -> Result<(), CodecError> {
    write_buffer(buf, value.as_bytes())
}

pub fn read_script(buf: &mut ByteBuffer) -> Result<Script, CodecError> {
    read_buffer(buf).map(Script::new)
}

pub fn write_script_hash(buf: &mut ByteBuffer, value: &ScriptHash) {
    write_digest(buf, &value.0);
}

pub fn read_script_hash(buf: &mut ByteBuffer) -> Result<ScriptHash, CodecError> {
    read_digest(buf).map(ScriptHash)
}

/// The scaled amount as a zig-zag varint. Amounts outside the `i64` range
/// cannot be represented on the wire and are rejected.
pub fn write_asset(buf: &mut ByteBuffer, value: &Asset) -> Result<(), CodecError> {
    let amount = value
        .amount()
        .to_i64()
        .ok_or_else(|| CodecError::AssetOverflow(value.to_string()))?;
    buf.write_var_i64_zigzag(amount);
    Ok(())
}

pub fn read_asset(buf: &mut ByteBuffer) -> Result<Asset, CodecError> {
    buf.read_var_i64_zigzag().map(Asset::new)
}
