//! Script hashes: account addresses.
//!
//! An account is identified by the double SHA-256 of the script that
//! authorizes spending from it. Its text form is a tagged WIF with the script
//! hash prefix byte.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::hash::Digest;
use super::wif::{self, WifError};
use crate::config::{DIGEST_LENGTH, SCRIPT_HASH_BUF_PREFIX};

/// Double SHA-256 of a script's bytes. Exactly 32 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScriptHash(pub Digest);

impl ScriptHash {
    pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        self.0.as_bytes()
    }

    pub fn to_wif(&self) -> String {
        wif::encode(SCRIPT_HASH_BUF_PREFIX, self.0.as_ref(), true)
    }

    pub fn from_wif(wif_str: &str) -> Result<Self, WifError> {
        let bytes = wif::decode(wif_str, SCRIPT_HASH_BUF_PREFIX, true)?;
        let digest = Digest::from_slice(&bytes).map_err(|_| {
            WifError::new(format!("invalid hash length (got {} bytes)", bytes.len()))
        })?;
        Ok(Self(digest))
    }
}

impl From<Digest> for ScriptHash {
    fn from(digest: Digest) -> Self {
        Self(digest)
    }
}

impl fmt::Display for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wif())
    }
}

impl fmt::Debug for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptHash({})", self.to_wif())
    }
}

impl FromStr for ScriptHash {
    type Err = WifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wif(s)
    }
}

impl Serialize for ScriptHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wif())
    }
}

impl<'de> Deserialize<'de> for ScriptHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_wif(&s).map_err(serde::de::Error::custom)
    }
}
