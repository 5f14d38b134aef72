//! Percentage value object (0-100 scale, decimal precision).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A value between 0 and 100 inclusive, e.g. `12.5` for twelve and a half percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percentage(Decimal);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(Decimal::ONE_HUNDRED);

    /// Creates a Percentage, returning error if out of range.
    pub fn try_new(value: Decimal) -> Result<Self, ValidationError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(ValidationError::out_of_range("percentage", 0, 100, value));
        }
        Ok(Self(value))
    }

    /// Creates a Percentage, clamping to valid range.
    pub fn clamped(value: Decimal) -> Self {
        Self(value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }

    /// Returns the value on the 0-100 scale.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the value as a fraction (0 to 1).
    pub fn as_fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<Decimal> for Percentage {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Percentage> for Decimal {
    fn from(value: Percentage) -> Self {
        value.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_accepts_bounds() {
        assert!(Percentage::try_new(Decimal::ZERO).is_ok());
        assert!(Percentage::try_new(Decimal::ONE_HUNDRED).is_ok());
        assert!(Percentage::try_new(Decimal::new(125, 1)).is_ok());
    }

    #[test]
    fn try_new_rejects_out_of_range() {
        assert!(Percentage::try_new(Decimal::from(-1)).is_err());
        assert!(Percentage::try_new(Decimal::new(1001, 1)).is_err());
    }

    #[test]
    fn clamped_limits_to_range() {
        assert_eq!(Percentage::clamped(Decimal::from(150)), Percentage::HUNDRED);
        assert_eq!(Percentage::clamped(Decimal::from(-3)), Percentage::ZERO);
    }

    #[test]
    fn as_fraction_divides_by_hundred() {
        let p = Percentage::try_new(Decimal::from(25)).unwrap();
        assert_eq!(p.as_fraction(), Decimal::new(25, 2));
    }

    #[test]
    fn displays_with_percent_sign() {
        let p = Percentage::try_new(Decimal::new(1250, 2)).unwrap();
        assert_eq!(p.to_string(), "12.5%");
    }

    #[test]
    fn deserialization_rejects_out_of_range() {
        let ok: Result<Percentage, _> = serde_json::from_str("\"40\"");
        assert!(ok.is_ok());
        let bad: Result<Percentage, _> = serde_json::from_str("\"140\"");
        assert!(bad.is_err());
    }
}
