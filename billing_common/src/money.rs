use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign},
    str::FromStr,
};

use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

/// The number of decimal places every monetary amount is held at.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

const MINOR_UNITS_PER_MAJOR: i64 = 100;

//--------------------------------------        Money        ---------------------------------------------------------
/// A non-negative, fixed-point monetary amount with two decimal places.
///
/// The value is held as an integer number of minor units (cents), which is also how it is stored in the database.
/// Values enter the system as decimal strings (or JSON numbers) and are converted through [`Decimal`], so no amount is
/// ever routed through binary floating point arithmetic. On the wire, amounts are always rendered with two places,
/// e.g. `"40.00"`.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, PartialEq, Eq, Hash)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(inplace Money, AddAssign, add_assign);

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyConversionError {
    #[error("Monetary amounts cannot be negative: {0}")]
    Negative(String),
    #[error("Monetary amounts have at most {MONEY_DECIMAL_PLACES} decimal places: {0}")]
    TooPrecise(String),
    #[error("Value is too large to be represented as a monetary amount: {0}")]
    Overflow(String),
    #[error("Not a valid decimal amount: {0}")]
    Invalid(String),
}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates an amount from a whole number of minor units (cents).
    pub fn from_cents(cents: i64) -> Result<Self, MoneyConversionError> {
        if cents < 0 {
            return Err(MoneyConversionError::Negative(cents.to_string()));
        }
        Ok(Self(cents))
    }

    /// The amount in minor units (cents)
    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MONEY_DECIMAL_PLACES)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Multiplies the amount by a (non-negative) quantity. Returns `None` on overflow or for negative quantities.
    pub fn checked_mul(self, quantity: i64) -> Option<Self> {
        if quantity < 0 {
            return None;
        }
        self.0.checked_mul(quantity).map(Self)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyConversionError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value < Decimal::ZERO {
            return Err(MoneyConversionError::Negative(value.to_string()));
        }
        let normalized = value.normalize();
        if normalized.scale() > MONEY_DECIMAL_PLACES {
            return Err(MoneyConversionError::TooPrecise(value.to_string()));
        }
        normalized
            .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
            .and_then(|cents| cents.to_i64())
            .map(Self)
            .ok_or_else(|| MoneyConversionError::Overflow(value.to_string()))
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.to_decimal()
    }
}

impl FromStr for Money {
    type Err = MoneyConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|e| MoneyConversionError::Invalid(format!("{s}. {e}")))?;
        Self::try_from(value)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::try_from(value).map_err(DeError::custom)
    }
}
