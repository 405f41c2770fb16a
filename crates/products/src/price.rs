use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult, ValueObject};

/// Decimal currency amount stored as `NUMERIC(10,2)`.
///
/// Always non-negative, at most two fractional digits and eight integer digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl ValueObject for Price {}

impl Price {
    pub const SCALE: u32 = 2;
    pub const PRECISION: u32 = 10;

    pub fn new(amount: Decimal) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::data_validation(format!(
                "Invalid price: {amount} is negative"
            )));
        }

        let normalized = amount.normalize();
        if normalized.scale() > Self::SCALE {
            return Err(DomainError::data_validation(format!(
                "Invalid price: {amount} has more than {} decimal places",
                Self::SCALE
            )));
        }

        let limit = Decimal::from(10_i64.pow(Self::PRECISION - Self::SCALE));
        if normalized >= limit {
            return Err(DomainError::data_validation(format!(
                "Invalid price: {amount} exceeds {}",
                limit - Decimal::new(1, Self::SCALE)
            )));
        }

        let mut amount = normalized.abs();
        amount.rescale(Self::SCALE);
        Ok(Self(amount))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl Default for Price {
    fn default() -> Self {
        Self(Decimal::new(0, Self::SCALE))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim())
            .map_err(|e| DomainError::data_validation(format!("Invalid price: {s}: {e}")))?;
        Self::new(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_to_two_decimal_places() {
        let price: Price = "12.5".parse().unwrap();
        assert_eq!(price.to_string(), "12.50");
        assert_eq!(price, "12.500".parse::<Price>().unwrap());
    }

    #[test]
    fn zero_is_allowed() {
        assert_eq!("0".parse::<Price>().unwrap(), Price::default());
        assert_eq!("-0.00".parse::<Price>().unwrap(), Price::default());
    }

    #[test]
    fn rejects_negative_amounts() {
        let err = "-1.00".parse::<Price>().unwrap_err();
        assert!(matches!(err, DomainError::DataValidation(msg) if msg.contains("negative")));
    }

    #[test]
    fn rejects_sub_cent_precision() {
        assert!("1.005".parse::<Price>().is_err());
    }

    #[test]
    fn rejects_amounts_outside_numeric_10_2() {
        assert!("99999999.99".parse::<Price>().is_ok());
        assert!("100000000".parse::<Price>().is_err());
    }

    #[test]
    fn rejects_non_decimal_text() {
        assert!("twelve".parse::<Price>().is_err());
    }
}
