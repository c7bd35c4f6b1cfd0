//! Monetary amounts sent to and received from the gateway.
//!
//! Amounts are stored as [`Decimal`] values rounded half away from zero to
//! exactly two decimal places, so `19.999` becomes `20.00` and `10` becomes
//! `10.00`.
//!
//! # Serialization
//!
//! Serialized as a string to avoid floating point loss in JSON. Deserialization
//! accepts either a string or a JSON number.
//!
//! ```json
//! "20.00"
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Number of decimal places kept by an [`Amount`].
pub const AMOUNT_SCALE: u32 = 2;

/// A non-negative currency amount with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

/// Errors produced when constructing an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// The input was NaN or infinite.
    #[error("amount must be a finite number")]
    NotFinite,
    /// The input was below zero.
    #[error("amount must not be negative: {0}")]
    Negative(String),
    /// The input string could not be parsed as a decimal.
    #[error("invalid amount {0:?}")]
    Invalid(String),
}

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, AMOUNT_SCALE));

    /// Creates an amount from a decimal, rounding to two places.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Negative`] if `value` is below zero.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_zero() {
            return Ok(Self::ZERO);
        }
        if value.is_sign_negative() {
            return Err(AmountError::Negative(value.to_string()));
        }
        let mut rounded =
            value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(AMOUNT_SCALE);
        Ok(Self(rounded))
    }

    /// Creates an amount from a floating point number, rounding to two places.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NotFinite`] for NaN or infinite input and
    /// [`AmountError::Negative`] for values below zero.
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::NotFinite);
        }
        let decimal =
            Decimal::try_from(value).map_err(|_| AmountError::Invalid(value.to_string()))?;
        Self::new(decimal)
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| AmountError::Invalid(s.to_owned()))?;
        Self::new(decimal)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<f64> for Amount {
    type Error = AmountError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value)
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        let mut decimal = Decimal::from(value);
        decimal.rescale(AMOUNT_SCALE);
        Self(decimal)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self::from_str(&text).map_err(de::Error::custom),
            Raw::Number(number) => Self::from_str(&number.to_string()).map_err(de::Error::custom),
        }
    }
}
