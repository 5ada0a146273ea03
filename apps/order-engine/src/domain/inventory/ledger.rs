//! Inventory ledger port.

use async_trait::async_trait;

use super::InventoryError;
use crate::domain::shared::{Money, ProductId, Quantity, StockLevel};

/// Result of a conditional stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// Stock was decremented.
    Reserved,
    /// Stock was left untouched because it could not cover the request.
    Insufficient {
        /// Units available at the time of the check.
        available: StockLevel,
    },
    /// No such product.
    UnknownProduct,
}

/// Stock and price access within one open transaction.
///
/// Implementations must make `try_reserve` a single indivisible
/// check-and-decrement with respect to concurrent transactions on the same
/// product, and must read prices from the same transaction.
#[async_trait]
pub trait InventoryLedger: Send {
    /// Decrement available stock by `quantity` iff at least `quantity` is available.
    async fn try_reserve(
        &mut self,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<ReserveOutcome, InventoryError>;

    /// Current unit price, or `None` if the product does not exist.
    async fn current_price(&mut self, product_id: &ProductId)
    -> Result<Option<Money>, InventoryError>;

    /// Return `quantity` units to stock.
    async fn restock(
        &mut self,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<(), InventoryError>;
}
