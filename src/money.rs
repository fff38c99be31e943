//! Fixed-point money amounts.
//!
//! Amounts are held as a signed number of cents so that sums over many
//! transactions never drift. Conversion to and from decimals only happens at
//! the edges: parsing request bodies and serializing responses.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub},
};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// The largest amount a single transaction may have, in cents.
///
/// Matches a `DECIMAL(10, 2)` column: 99,999,999.99.
pub const MAX_TRANSACTION_CENTS: i64 = 9_999_999_999;

/// An amount of money with two decimal places of precision.
///
/// The value is signed so that it can also represent derived values such as a
/// balance. Transaction amounts are always positive, see [Money::transaction_amount].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero dollars and zero cents.
    pub const ZERO: Money = Money(0);

    /// Create an amount from a whole number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount as a whole number of cents.
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Convert a decimal to money, rounding half away from zero to two decimal places.
    ///
    /// # Errors
    /// Returns [Error::AmountTooLarge] if the value does not fit in 64 bits of cents.
    pub fn from_decimal(value: Decimal) -> Result<Self, Error> {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        rounded
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Self)
            .ok_or(Error::AmountTooLarge)
    }

    /// Validate `value` as the amount of a transaction.
    ///
    /// The amount is rounded to two decimal places first, so `0.001` is
    /// treated as zero and rejected.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::InvalidAmount] if the rounded amount is zero or negative,
    /// - [Error::AmountTooLarge] if the amount is larger than [MAX_TRANSACTION_CENTS].
    pub fn transaction_amount(value: Decimal) -> Result<Self, Error> {
        let money = Self::from_decimal(value)?;

        if money.0 <= 0 {
            Err(Error::InvalidAmount)
        } else if money.0 > MAX_TRANSACTION_CENTS {
            Err(Error::AmountTooLarge)
        } else {
            Ok(money)
        }
    }

    /// The amount as a decimal with exactly two decimal places.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Whether the amount is less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// The absolute value of the amount.
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_decimal().fmt(f)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// Serialized as a JSON number with two fractional digits, e.g. `1000.00`.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::arbitrary_precision::serialize(&self.to_decimal(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = rust_decimal::serde::arbitrary_precision::deserialize(deserializer)?;

        Money::from_decimal(value).map_err(serde::de::Error::custom)
    }
}
