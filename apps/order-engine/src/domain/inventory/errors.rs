//! Inventory errors.

use crate::domain::shared::{ProductId, Quantity};

/// Errors raised while reserving stock or resolving prices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    /// Product does not exist.
    #[error("product '{product_id}' not found")]
    ProductNotFound {
        /// Requested product.
        product_id: ProductId,
    },

    /// Not enough stock to cover the request.
    #[error("insufficient stock for product '{product_id}': requested {requested}, available {available}")]
    InsufficientStock {
        /// Requested product.
        product_id: ProductId,
        /// Units requested.
        requested: Quantity,
        /// Best-effort snapshot of units available when the request was rejected.
        available: i64,
    },

    /// Underlying store failed.
    #[error("inventory store error: {message}")]
    Store {
        /// Underlying error message.
        message: String,
        /// Whether retrying the whole transaction may succeed.
        transient: bool,
    },
}
