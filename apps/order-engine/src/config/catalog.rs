//! Catalog seed for local runs.
//!
//! Catalog maintenance belongs to another service. A seed lets a fresh
//! local database take orders without it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Product;
use crate::domain::shared::{DomainError, Money, ProductId};

/// Catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Products upserted at startup.
    #[serde(default)]
    pub seed: Vec<SeedProduct>,
}

/// One seeded product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedProduct {
    /// Product ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Units in stock.
    pub available_quantity: i64,
    /// Category.
    #[serde(default)]
    pub category_id: Option<String>,
}

impl SeedProduct {
    /// Convert to a catalog product.
    ///
    /// # Errors
    ///
    /// Returns error if the name is blank or price or stock is negative.
    pub fn to_product(&self) -> Result<Product, DomainError> {
        Product::new(
            ProductId::new(self.id.clone()),
            self.name.clone(),
            Money::new(self.price),
            self.available_quantity,
            self.category_id.clone(),
        )
    }
}
