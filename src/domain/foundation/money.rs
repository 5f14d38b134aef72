//! Money value object.
//!
//! Single currency, two decimal places. Every constructor and arithmetic
//! result is rounded half-away-from-zero so stored amounts never carry
//! sub-cent residue.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

use super::{Percentage, ValidationError};

const DECIMAL_PLACES: u32 = 2;

/// Rounds to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// A signed monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Creates an amount, rounding to cents.
    pub fn new(amount: Decimal) -> Self {
        Self(round_money(amount))
    }

    /// Creates an amount from whole currency units.
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Creates an amount from cents (`12345` is `123.45`).
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, DECIMAL_PLACES))
    }

    /// Parses an amount that must be strictly positive.
    pub fn positive(amount: Decimal, field: &str) -> Result<Self, ValidationError> {
        let money = Self::new(amount);
        if !money.is_positive() {
            return Err(ValidationError::invalid_format(field, "must be greater than zero"));
        }
        Ok(money)
    }

    /// Parses an amount that must be zero or greater.
    pub fn non_negative(amount: Decimal, field: &str) -> Result<Self, ValidationError> {
        let money = Self::new(amount);
        if money.is_negative() {
            return Err(ValidationError::invalid_format(field, "must not be negative"));
        }
        Ok(money)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Applies a percentage discount: `self × (1 − pct/100)`.
    pub fn discounted_by(&self, discount: Percentage) -> Self {
        Self::new(self.0 * (Decimal::ONE - discount.as_fraction()))
    }

    /// Share of this amount at the given rate: `self × pct/100`.
    pub fn share(&self, rate: Percentage) -> Self {
        Self::new(self.0 * rate.as_fraction())
    }

    /// Difference clamped at zero.
    pub fn saturating_sub(self, other: Money) -> Self {
        if other >= self {
            Money::ZERO
        } else {
            self - other
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::new(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money::new(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::new(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Money::new)
            .map_err(|e| ValidationError::invalid_format("amount", e.to_string()))
    }
}
