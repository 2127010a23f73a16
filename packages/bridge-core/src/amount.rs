use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Arbitrary precision fixed point amount.
///
/// The value is kept as an integer of the smallest unit (`inner`) together with the
/// number of decimals it is denominated in. Arithmetic between amounts of different
/// precision is carried out at the larger precision, so nothing is truncated.
/// Amounts may be negative.
#[derive(Debug, Clone)]
pub struct FixedPoint {
    inner: BigInt,
    decimals: u8,
}

impl FixedPoint {
    pub fn zero(decimals: u8) -> Self {
        Self { inner: BigInt::default(), decimals }
    }

    /// Builds an amount from chain data, i.e. a value in the smallest unit.
    pub fn from_inner(inner: impl Into<BigInt>, decimals: u8) -> Self {
        Self { inner: inner.into(), decimals }
    }

    /// Parses a decimal integer string of smallest units.
    pub fn parse_inner(raw: &str, decimals: u8) -> Result<Self> {
        let inner = BigInt::from_str(raw.trim())
            .map_err(|e| Error::InvalidAmount(format!("{}: {}", raw, e)))?;
        Ok(Self { inner, decimals })
    }

    /// Parses a human readable amount such as `"1.5"` at the given precision.
    pub fn from_decimal_str(value: &str, decimals: u8) -> Result<Self> {
        let value = value.trim();
        let (negative, digits) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(Error::InvalidAmount(value.to_string()));
        }
        if fraction.len() > decimals as usize {
            return Err(Error::InvalidAmount(format!(
                "{} has more than {} decimals",
                value, decimals
            )));
        }
        let padded = format!(
            "{}{}{}",
            if whole.is_empty() { "0" } else { whole },
            fraction,
            "0".repeat(decimals as usize - fraction.len())
        );
        if !padded.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidAmount(value.to_string()));
        }
        let mut amount = Self::parse_inner(&padded, decimals)?;
        if negative {
            amount.inner = -amount.inner;
        }
        Ok(amount)
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn inner(&self) -> &BigInt {
        &self.inner
    }

    pub fn is_negative(&self) -> bool {
        self.inner.sign() == Sign::Minus
    }

    pub fn is_zero(&self) -> bool {
        self.inner.sign() == Sign::NoSign
    }

    /// Re-expresses the amount at another precision. Scaling down truncates.
    pub fn with_decimals(&self, decimals: u8) -> Self {
        Self { inner: self.scaled_inner(decimals), decimals }
    }

    /// Multiplies by `numerator / denominator`, truncating toward zero.
    pub fn mul_ratio(&self, numerator: u32, denominator: u32) -> Self {
        let denominator = denominator.max(1);
        Self {
            inner: &self.inner * BigInt::from(numerator) / BigInt::from(denominator),
            decimals: self.decimals,
        }
    }

    /// Value in the smallest unit at `decimals`, as passed to extrinsics.
    ///
    /// Fails for negative amounts, for values that lose precision when rescaled, and for
    /// values that do not fit into a `u128` balance.
    pub fn to_chain_data(&self, decimals: u8) -> Result<u128> {
        if self.is_negative() {
            return Err(Error::InvalidAmount(format!("negative amount {}", self)));
        }
        let scaled = self.with_decimals(decimals);
        if scaled.with_decimals(self.decimals).inner != self.inner {
            return Err(Error::InvalidAmount(format!(
                "{} is not representable with {} decimals",
                self, decimals
            )));
        }
        u128::try_from(&scaled.inner)
            .map_err(|_| Error::InvalidAmount(format!("{} overflows a u128 balance", self)))
    }

    fn scaled_inner(&self, decimals: u8) -> BigInt {
        match decimals.cmp(&self.decimals) {
            Ordering::Equal => self.inner.clone(),
            Ordering::Greater => &self.inner * pow10(decimals - self.decimals),
            Ordering::Less => &self.inner / pow10(self.decimals - decimals),
        }
    }
}

fn pow10(exponent: u8) -> BigInt {
    BigInt::from(10u32).pow(exponent as u32)
}

impl Add for FixedPoint {
    type Output = FixedPoint;

    fn add(self, rhs: FixedPoint) -> FixedPoint {
        &self + &rhs
    }
}

impl Add for &FixedPoint {
    type Output = FixedPoint;

    fn add(self, rhs: &FixedPoint) -> FixedPoint {
        let decimals = self.decimals.max(rhs.decimals);
        FixedPoint {
            inner: self.scaled_inner(decimals) + rhs.scaled_inner(decimals),
            decimals,
        }
    }
}

impl Sub for FixedPoint {
    type Output = FixedPoint;

    fn sub(self, rhs: FixedPoint) -> FixedPoint {
        &self - &rhs
    }
}

impl Sub for &FixedPoint {
    type Output = FixedPoint;

    fn sub(self, rhs: &FixedPoint) -> FixedPoint {
        let decimals = self.decimals.max(rhs.decimals);
        FixedPoint {
            inner: self.scaled_inner(decimals) - rhs.scaled_inner(decimals),
            decimals,
        }
    }
}

impl PartialEq for FixedPoint {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FixedPoint {}

impl PartialOrd for FixedPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FixedPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        let decimals = self.decimals.max(other.decimals);
        self.scaled_inner(decimals).cmp(&other.scaled_inner(decimals))
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.inner.magnitude().to_string();
        let sign = if self.is_negative() { "-" } else { "" };
        let decimals = self.decimals as usize;
        if decimals == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        let digits = format!("{:0>width$}", digits, width = decimals + 1);
        let (whole, fraction) = digits.split_at(digits.len() - decimals);
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            write!(f, "{}{}", sign, whole)
        } else {
            write!(f, "{}{}.{}", sign, whole, fraction)
        }
    }
}

impl Serialize for FixedPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// A raw chain balance (`u128`) read from either a JSON number or a decimal / `0x` hex string.
///
/// Chain clients render large balances as strings, static config keeps them as strings to
/// stay clear of TOML's `i64` integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChainAmount(pub u128);

impl<'de> Deserialize<'de> for ChainAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(ChainAmount(n as u128)),
            Raw::Text(s) => parse_chain_amount(&s).map(ChainAmount).map_err(serde::de::Error::custom),
        }
    }
}

fn parse_chain_amount(raw: &str) -> std::result::Result<u128, String> {
    let raw = raw.trim().replace(',', "");
    match raw.strip_prefix("0x") {
        Some(hex) => u128::from_str_radix(hex, 16).map_err(|e| format!("{}: {}", raw, e)),
        None => raw.parse::<u128>().map_err(|e| format!("{}: {}", raw, e)),
    }
}
