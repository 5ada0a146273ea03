//! Quantity value objects: units ordered and units on hand.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// A number of units on an order line. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(u32);

impl Quantity {
    /// Create a line quantity.
    ///
    /// # Errors
    ///
    /// Returns error if the quantity is zero.
    pub fn new(units: u32) -> Result<Self, DomainError> {
        if units == 0 {
            return Err(DomainError::invalid("quantity", "must be greater than 0"));
        }
        Ok(Self(units))
    }

    /// Create a line quantity from a signed integer (wire or storage form).
    ///
    /// # Errors
    ///
    /// Returns error if the value is not in `1..=u32::MAX`.
    pub fn try_from_i64(units: i64) -> Result<Self, DomainError> {
        if units <= 0 {
            return Err(DomainError::invalid(
                "quantity",
                format!("must be greater than 0, got {units}"),
            ));
        }
        u32::try_from(units)
            .map_err(|_| DomainError::invalid("quantity", format!("{units} is too large")))
            .and_then(Self::new)
    }

    /// Units as `u32`.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Units as `i64`, the form used in stock arithmetic.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0 as i64
    }
}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_from_i64(value)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        value.as_i64()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Units of a product available for sale. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct StockLevel(i64);

impl StockLevel {
    /// No stock.
    pub const ZERO: Self = Self(0);

    /// Create a stock level.
    ///
    /// # Errors
    ///
    /// Returns error if the level is negative.
    pub fn new(units: i64) -> Result<Self, DomainError> {
        if units < 0 {
            return Err(DomainError::invalid(
                "available_quantity",
                format!("cannot be negative, got {units}"),
            ));
        }
        Ok(Self(units))
    }

    /// Units on hand.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Whether `requested` units can be taken from this level.
    #[must_use]
    pub const fn covers(&self, requested: Quantity) -> bool {
        self.0 >= requested.as_i64()
    }

    /// Level after taking `requested` units, or `None` if that would go negative.
    #[must_use]
    pub const fn checked_take(&self, requested: Quantity) -> Option<Self> {
        if self.covers(requested) {
            Some(Self(self.0 - requested.as_i64()))
        } else {
            None
        }
    }

    /// Level after returning `units` to stock.
    #[must_use]
    pub const fn restock(&self, units: Quantity) -> Self {
        Self(self.0.saturating_add(units.as_i64()))
    }
}

impl TryFrom<i64> for StockLevel {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StockLevel> for i64 {
    fn from(value: StockLevel) -> Self {
        value.0
    }
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
