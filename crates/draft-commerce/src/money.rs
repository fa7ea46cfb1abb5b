//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. Amounts arrive from
//! the quote frontend as decimal text or JSON numbers and are parsed
//! digit-by-digit, never through binary floating point arithmetic.

use crate::error::CommerceError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Cents per whole currency unit.
const CENTS_PER_UNIT: i64 = 100;

/// A monetary value in the shop currency.
///
/// Amounts are stored in cents. Serialized form is always a string with
/// exactly two fraction digits (`"90.00"`), which is what the draft-order
/// API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
}

impl Money {
    /// Zero.
    pub const ZERO: Money = Money { amount_cents: 0 };

    /// Smallest representable positive amount.
    pub const ONE_CENT: Money = Money { amount_cents: 1 };

    /// Create a new Money value from cents.
    pub const fn new(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Parse decimal text such as `"90"`, `"1,299.50"`, `"$15.00"`, `"-4.125"`
    /// or the accounting form `"(15.00)"`.
    ///
    /// Digits past the cent round half-up (away from zero).
    ///
    /// ```
    /// use draft_commerce::money::Money;
    /// assert_eq!(Money::parse("49.99").unwrap().amount_cents, 4999);
    /// assert_eq!(Money::parse("0.125").unwrap().amount_cents, 13);
    /// ```
    pub fn parse(text: &str) -> Result<Self, CommerceError> {
        let invalid = || CommerceError::InvalidAmount(text.to_string());

        let mut s = text.trim();
        let mut negative = false;

        if let Some(inner) = s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
            negative = true;
            s = inner.trim();
        }
        if let Some(rest) = s.strip_prefix('-') {
            if negative {
                return Err(invalid());
            }
            negative = true;
            s = rest.trim_start();
        } else if let Some(rest) = s.strip_prefix('+') {
            s = rest.trim_start();
        }
        if let Some(rest) = s.strip_prefix('$') {
            s = rest.trim_start();
            if let Some(rest) = s.strip_prefix('-') {
                if negative {
                    return Err(invalid());
                }
                negative = true;
                s = rest;
            }
        }

        let cleaned: String = s.chars().filter(|c| *c != ',').collect();
        let (whole, fraction) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| CommerceError::Overflow)?
        };

        let mut digits = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|d| d >= 5);

        let mut cents = units
            .checked_mul(CENTS_PER_UNIT)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .ok_or(CommerceError::Overflow)?;

        if negative {
            cents = -cents;
        }
        Ok(Self::new(cents))
    }

    /// Convert a JSON floating-point number.
    ///
    /// The shortest decimal rendering of the float is parsed, so `0.1`
    /// becomes ten cents rather than `0.1000000000000000055...`.
    pub fn from_f64(value: f64) -> Result<Self, CommerceError> {
        if !value.is_finite() {
            return Err(CommerceError::InvalidAmount(value.to_string()));
        }
        Self::parse(&value.to_string())
    }

    /// Create from whole currency units.
    pub fn from_units(units: i64) -> Result<Self, CommerceError> {
        units
            .checked_mul(CENTS_PER_UNIT)
            .map(Self::new)
            .ok_or(CommerceError::Overflow)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Get the absolute value.
    pub fn abs(&self) -> Self {
        Self::new(self.amount_cents.saturating_abs())
    }

    /// Multiply by `numerator / denominator`, rounding half-up (away from zero)
    /// to the cent.
    ///
    /// Returns `None` when the denominator is zero.
    pub fn scale(&self, numerator: i64, denominator: i64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let product = i128::from(self.amount_cents) * i128::from(numerator);
        let denominator = i128::from(denominator);
        let quotient = product / denominator;
        let remainder = product % denominator;
        let rounded = if remainder.abs() * 2 >= denominator.abs() {
            if (product < 0) != (denominator < 0) {
                quotient - 1
            } else {
                quotient + 1
            }
        } else {
            quotient
        };
        i64::try_from(rounded).ok().map(Self::new)
    }

    /// Format without symbol, always two fraction digits (e.g. `"49.99"`, `"-0.05"`).
    pub fn display_amount(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let magnitude = self.amount_cents.unsigned_abs();
        format!("{sign}{}.{:02}", magnitude / 100, magnitude % 100)
    }

    /// Sum, or `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.amount_cents.checked_add(other.amount_cents).map(Self::new)
    }

    /// Difference, or `None` on overflow.
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.amount_cents.checked_sub(other.amount_cents).map(Self::new)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_amount())
    }
}

impl std::str::FromStr for Money {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display_amount())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::parse(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Money::from_units(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        let units = i64::try_from(v).map_err(|_| E::custom(CommerceError::Overflow))?;
        Money::from_units(units).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_f64(v).map_err(E::custom)
    }
}
