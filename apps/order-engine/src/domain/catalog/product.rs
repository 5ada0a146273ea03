//! Product read model.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{DomainError, Money, ProductId, StockLevel};

/// A sellable product as seen by the order engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current unit price.
    pub price: Money,
    /// Units available for sale.
    pub available: StockLevel,
    /// Category reference, if any.
    pub category_id: Option<String>,
}

impl Product {
    /// Build a product, checking price and stock invariants.
    ///
    /// # Errors
    ///
    /// Returns error if the name is blank, the price negative or the stock negative.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Money,
        available: i64,
        category_id: Option<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid("name", "cannot be blank"));
        }
        Ok(Self {
            id,
            name,
            price: Money::price(price.amount())?,
            available: StockLevel::new(available)?,
            category_id,
        })
    }
}
