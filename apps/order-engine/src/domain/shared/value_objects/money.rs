//! Money value object for currency amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::Quantity;
use crate::domain::shared::DomainError;

/// A monetary amount in the storefront currency.
///
/// Represented as a Decimal so that line totals and order totals are exact.
/// Serialized as a decimal string (`"300.00"`), never as a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a new Money value from a Decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Parse a canonical decimal string as stored by the persistence layer.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a decimal number.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        Decimal::from_str(text.trim())
            .map(Self)
            .map_err(|e| DomainError::invalid("money", format!("'{text}' is not a decimal: {e}")))
    }

    /// Create a unit price, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns error if the amount is negative.
    pub fn price(amount: Decimal) -> Result<Self, DomainError> {
        if amount < Decimal::ZERO {
            return Err(DomainError::invalid(
                "price",
                format!("price cannot be negative, got {amount}"),
            ));
        }
        Ok(Self(amount))
    }

    /// Get the inner Decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// `self * quantity`, or `None` if the product overflows.
    #[must_use]
    pub fn checked_mul(self, quantity: Quantity) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity.value())).map(Self)
    }

    /// `self + rhs`, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Sum of `amounts`, or `None` if any partial sum overflows.
    #[must_use]
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts.into_iter().try_fold(Self::ZERO, Self::checked_add)
    }

    /// Round to 2 decimal places (half away from zero).
    #[must_use]
    pub fn round(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Text used for storage. Keeps the scale so `300.00` reads back as `300.00`.
    #[must_use]
    pub fn to_storage(&self) -> String {
        self.0.to_string()
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round().0)
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}
