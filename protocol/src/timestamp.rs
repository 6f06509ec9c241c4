//! Unsigned epoch-millisecond timestamps used by transactions and blocks.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("timestamp must be an unsigned long (got {0})")]
pub struct TimestampError(pub i128);

/// Milliseconds since the Unix epoch. Always unsigned on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Current wall-clock time. A clock set before 1970 reads as the epoch.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self(millis)
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Timestamp {
    fn from(millis: u64) -> Self {
        Self(millis)
    }
}

impl TryFrom<i128> for Timestamp {
    type Error = TimestampError;

    /// Accepted only when the value fits an unsigned 64-bit integer.
    fn try_from(millis: i128) -> Result<Self, Self::Error> {
        u64::try_from(millis)
            .map(Self)
            .map_err(|_| TimestampError(millis))
    }
}

impl TryFrom<i64> for Timestamp {
    type Error = TimestampError;

    /// Signed timestamps are accepted only when they are non-negative.
    fn try_from(millis: i64) -> Result<Self, Self::Error> {
        Self::try_from(i128::from(millis))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
