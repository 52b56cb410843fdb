//! # Monetary Quantity
//!
//! [`Amount`] is the only numeric type that crosses the RPC boundary into the store. It wraps an
//! arbitrary-precision [`BigDecimal`] so chained products (price × quantity × percentage) never
//! pick up floating point drift.

use alloy_primitives::U256;
use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, Sign};
use num_traits::{One, Zero};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

/// Decimals used by every token unless the deployment says otherwise.
pub const DEFAULT_DECIMALS: u8 = 18;

/// `U256::MAX` has 78 decimal digits, so any integer of 79 digits or more overflows.
const U256_MAX_DIGITS: i64 = 78;

/// Descaled on-chain quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigDecimal);

impl Amount {
    pub fn zero() -> Self {
        Self(BigDecimal::zero())
    }

    pub fn one() -> Self {
        Self(BigDecimal::one())
    }

    /// Descale a raw on-chain integer by `10^decimals`.
    pub fn from_raw(raw: U256, decimals: u8) -> Self {
        let int = BigInt::from_bytes_be(Sign::Plus, &raw.to_be_bytes::<32>());
        Self(BigDecimal::new(int, i64::from(decimals)).normalized())
    }

    /// Descale an 18-decimal integer.
    pub fn from_wei(raw: U256) -> Self {
        Self::from_raw(raw, DEFAULT_DECIMALS)
    }

    /// Scale back to an on-chain integer, truncating fraction digits beyond `decimals`.
    ///
    /// Returns `None` for negative values and values that overflow 256 bits.
    pub fn to_raw(&self, decimals: u8) -> Option<U256> {
        if self.0.sign() == Sign::Minus {
            return None;
        }
        if self.0.is_zero() {
            return Some(U256::ZERO);
        }
        // Decide by magnitude first so exponent notation never builds a huge power of ten.
        let (_, exponent) = self.0.as_bigint_and_exponent();
        let shift = i64::from(decimals).saturating_sub(exponent);
        if shift >= U256_MAX_DIGITS {
            return None;
        }
        if shift < 0 && shift.unsigned_abs() > self.0.digits() {
            return Some(U256::ZERO);
        }
        let scale = BigDecimal::new(BigInt::one(), -i64::from(decimals));
        let (int, _) = (&self.0 * &scale).with_scale(0).as_bigint_and_exponent();
        let (_, bytes) = int.to_bytes_be();
        U256::try_from_be_slice(&bytes)
    }

    /// `10^exp` as an amount.
    pub fn pow10(exp: u8) -> Self {
        Self(BigDecimal::new(BigInt::one(), -i64::from(exp)))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.sign() == Sign::Plus
    }

    /// `None` when `rhs` is zero.
    pub fn checked_div(&self, rhs: &Amount) -> Option<Amount> {
        if rhs.is_zero() {
            return None;
        }
        Some(Self(&self.0 / &rhs.0))
    }

    /// Round half-up to `dp` fraction digits.
    pub fn round_dp(&self, dp: u32) -> Amount {
        Self(self.0.with_scale_round(i64::from(dp), RoundingMode::HalfUp))
    }

    /// Fixed-point rendering with exactly `dp` fraction digits, like `toFixed`.
    pub fn to_fixed(&self, dp: u32) -> String {
        plain(&self.0.with_scale_round(i64::from(dp), RoundingMode::HalfUp))
    }

    pub fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }
}

/// Positional rendering without exponent notation.
fn plain(value: &BigDecimal) -> String {
    let (int, scale) = value.as_bigint_and_exponent();
    let negative = int.sign() == Sign::Minus;
    let digits = int.magnitude().to_string();
    let body = if scale <= 0 {
        let mut s = digits;
        if s != "0" {
            s.push_str(&"0".repeat(scale.unsigned_abs() as usize));
        }
        s
    } else {
        let scale = scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
        } else {
            digits
        };
        let (whole, frac) = padded.split_at(padded.len() - scale);
        format!("{}.{}", whole, frac)
    };
    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

impl From<BigDecimal> for Amount {
    fn from(value: BigDecimal) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl FromStr for Amount {
    type Err = bigdecimal::ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigDecimal::from_str(s.trim()).map(Self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&plain(&self.0.normalized()))
    }
}

impl Add for Amount {
    type Output = Amount;
    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a Amount> for &'a Amount {
    type Output = Amount;
    fn add(self, rhs: &'a Amount) -> Amount {
        Amount(&self.0 + &rhs.0)
    }
}

impl Sub for Amount {
    type Output = Amount;
    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl<'a> Sub<&'a Amount> for &'a Amount {
    type Output = Amount;
    fn sub(self, rhs: &'a Amount) -> Amount {
        Amount(&self.0 - &rhs.0)
    }
}

impl Mul for Amount {
    type Output = Amount;
    fn mul(self, rhs: Amount) -> Amount {
        Amount(self.0 * rhs.0)
    }
}

impl<'a> Mul<&'a Amount> for &'a Amount {
    type Output = Amount;
    fn mul(self, rhs: &'a Amount) -> Amount {
        Amount(&self.0 * &rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.fold(Amount::zero(), |acc, x| &acc + x)
    }
}
