//! Stock Guard
//!
//! Turns a ledger's conditional decrement into a typed reservation.

use tracing::debug;

use super::{InventoryError, InventoryLedger, ReserveOutcome};
use crate::domain::shared::{ProductId, Quantity};

/// Proof that stock for one line has been taken inside the current transaction.
///
/// Only [`StockGuard::reserve`] creates these, so a price can only be frozen
/// after its stock is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockReservation {
    product_id: ProductId,
    quantity: Quantity,
}

impl StockReservation {
    /// Reserved product.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Reserved units.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }
}

/// Stock Guard domain service.
pub struct StockGuard;

impl StockGuard {
    /// Atomically reserve `quantity` units of `product_id`.
    ///
    /// On failure the product's stock is untouched; earlier reservations in
    /// the same transaction are undone by the caller rolling back.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` for an unknown product and
    /// `InsufficientStock` when the available quantity cannot cover the request.
    pub async fn reserve<L>(
        ledger: &mut L,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<StockReservation, InventoryError>
    where
        L: InventoryLedger + ?Sized,
    {
        match ledger.try_reserve(product_id, quantity).await? {
            ReserveOutcome::Reserved => {
                debug!(product_id = %product_id, quantity = %quantity, "Stock reserved");
                Ok(StockReservation {
                    product_id: product_id.clone(),
                    quantity,
                })
            }
            ReserveOutcome::Insufficient { available } => Err(InventoryError::InsufficientStock {
                product_id: product_id.clone(),
                requested: quantity,
                available: available.value(),
            }),
            ReserveOutcome::UnknownProduct => Err(InventoryError::ProductNotFound {
                product_id: product_id.clone(),
            }),
        }
    }

    /// Put `quantity` units of `product_id` back into stock.
    ///
    /// # Errors
    ///
    /// Returns error if the ledger write fails.
    pub async fn release<L>(
        ledger: &mut L,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<(), InventoryError>
    where
        L: InventoryLedger + ?Sized,
    {
        ledger.restock(product_id, quantity).await?;
        debug!(product_id = %product_id, quantity = %quantity, "Stock released");
        Ok(())
    }
}
