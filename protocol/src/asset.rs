//! # Asset Amounts
//!
//! Fixed-point monetary amounts with exactly [`MAX_PRECISION`] fractional
//! digits over an arbitrary-precision integer. `1.00000 MARK` is stored as
//! the integer `100000`.
//!
//! ## Arithmetic
//!
//! Every operation returns a new `Asset` at the same scale:
//!
//! | op    | computation                        |
//! |-------|------------------------------------|
//! | `add` | `a + b`                            |
//! | `sub` | `a - b`                            |
//! | `mul` | `(a * b) / 10^5`                   |
//! | `div` | `(a * 10^5) / b`, `b != 0`         |
//! | `pow` | `a^n / 10^(5(n-1))`                |
//!
//! Rescaling truncates toward zero, so `-0.00001 * 0.50000` is `0.00000`
//! rather than `-0.00001`. Nothing here overflows; amounts only become
//! bounded when written to the wire as a 64-bit varint.

use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::{ASSET_SYMBOL, MAX_ASSET_STR_LEN, MAX_PRECISION};

/// Parse and arithmetic failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("input too large")]
    InputTooLarge,

    #[error("invalid format")]
    InvalidFormat,

    #[error("amount must be a valid number")]
    InvalidAmount,

    #[error("asset type must be {ASSET_SYMBOL}")]
    InvalidSymbol,

    #[error("invalid precision")]
    InvalidPrecision,

    #[error("divide by zero")]
    DivideByZero,

    #[error("exponent {0} is too large")]
    ExponentTooLarge(u32),
}

/// A signed amount of the native token, scaled by `10^5`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Asset {
    amount: BigInt,
}

fn scale(digits: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u8), digits as usize)
}

/// Moves `value` from `from` fractional digits to `to`. Shrinking divides and
/// truncates toward zero.
fn set_decimals(value: BigInt, from: u32, to: u32) -> BigInt {
    match to.cmp(&from) {
        std::cmp::Ordering::Greater => value * scale(to - from),
        std::cmp::Ordering::Less => value / scale(from - to),
        std::cmp::Ordering::Equal => value,
    }
}

/// `^-?[0-9]*\.?[0-9]+\.?$`
fn is_valid_amount(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    let s = s.strip_suffix('.').unwrap_or(s);
    let (int, frac) = match s.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => ("", s),
    };
    !frac.is_empty()
        && int.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit())
}

impl Asset {
    /// Wraps an already-scaled integer amount.
    pub fn new(amount: impl Into<BigInt>) -> Self {
        Self {
            amount: amount.into(),
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// The scaled integer: `12.34500 MARK` is `1234500`.
    pub fn amount(&self) -> &BigInt {
        &self.amount
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_negative()
    }

    pub fn mul(&self, other: &Asset) -> Asset {
        let product = &self.amount * &other.amount;
        Asset::new(set_decimals(product, MAX_PRECISION * 2, MAX_PRECISION))
    }

    pub fn div(&self, other: &Asset) -> Result<Asset, AssetError> {
        if other.amount.is_zero() {
            return Err(AssetError::DivideByZero);
        }
        let upscaled = set_decimals(self.amount.clone(), MAX_PRECISION, MAX_PRECISION * 2);
        Ok(Asset::new(upscaled / &other.amount))
    }

    /// Raises the amount to a whole power. `pow(0)` is `1.00000`.
    ///
    /// The raised value carries `5 * exp` fractional digits, so `exp` must
    /// keep that count within a `u32`.
    pub fn pow(&self, exp: u32) -> Result<Asset, AssetError> {
        let digits = MAX_PRECISION
            .checked_mul(exp)
            .ok_or(AssetError::ExponentTooLarge(exp))?;
        let raised = num_traits::pow(self.amount.clone(), exp as usize);
        Ok(Asset::new(set_decimals(raised, digits, MAX_PRECISION)))
    }

    pub fn gt(&self, other: &Asset) -> bool {
        self > other
    }

    pub fn geq(&self, other: &Asset) -> bool {
        self >= other
    }

    pub fn lt(&self, other: &Asset) -> bool {
        self < other
    }

    pub fn leq(&self, other: &Asset) -> bool {
        self <= other
    }
}

impl FromStr for Asset {
    type Err = AssetError;

    /// Parses `"[-]<int>.<5 digits> MARK"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_ASSET_STR_LEN {
            return Err(AssetError::InputTooLarge);
        }
        let mut parts = s.split(' ');
        let (Some(amount), Some(symbol), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(AssetError::InvalidFormat);
        };
        if !is_valid_amount(amount) {
            return Err(AssetError::InvalidAmount);
        }
        if symbol != ASSET_SYMBOL {
            return Err(AssetError::InvalidSymbol);
        }

        let Some(dot) = amount.find('.') else {
            return Err(AssetError::InvalidFormat);
        };
        if amount.len() - dot - 1 != MAX_PRECISION as usize {
            return Err(AssetError::InvalidPrecision);
        }

        let digits = amount.replacen('.', "", 1);
        let amount = digits
            .parse::<BigInt>()
            .map_err(|_| AssetError::InvalidAmount)?;
        Ok(Asset::new(amount))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.amount.magnitude().to_string();
        let precision = MAX_PRECISION as usize;
        let sign = if self.amount.is_negative() { "-" } else { "" };

        let (int, frac) = if digits.len() > precision {
            digits.split_at(digits.len() - precision)
        } else {
            ("0", digits.as_str())
        };
        write!(f, "{sign}{int}.{frac:0>precision$} {ASSET_SYMBOL}")
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Asset({self})")
    }
}

impl Add for &Asset {
    type Output = Asset;

    fn add(self, rhs: &Asset) -> Asset {
        Asset::new(&self.amount + &rhs.amount)
    }
}

impl Sub for &Asset {
    type Output = Asset;

    fn sub(self, rhs: &Asset) -> Asset {
        Asset::new(&self.amount - &rhs.amount)
    }
}

impl Neg for Asset {
    type Output = Asset;

    fn neg(self) -> Asset {
        Asset::new(-self.amount)
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
