//! Product catalog port.

use async_trait::async_trait;

use super::Product;
use crate::domain::shared::{Money, ProductId};

/// Catalog access error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// Storage failure.
    #[error("catalog storage error: {message}")]
    Storage {
        /// Underlying error message.
        message: String,
    },

    /// Stored row could not be mapped to a product.
    #[error("corrupt product row '{product_id}': {message}")]
    Corrupt {
        /// Offending product.
        product_id: String,
        /// What was wrong.
        message: String,
    },
}

/// Read access to products plus the seed write used at startup.
///
/// Stock is never changed through this port outside seeding; order
/// placement goes through [`crate::domain::inventory::InventoryLedger`].
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Find a product by ID.
    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError>;

    /// Insert or replace a product.
    async fn upsert_product(&self, product: &Product) -> Result<(), CatalogError>;

    /// Change a product's current price. Existing orders keep their snapshot.
    async fn set_price(&self, id: &ProductId, price: Money) -> Result<bool, CatalogError>;
}
