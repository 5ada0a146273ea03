//! Price Snapshot Resolver
//!
//! Reads the unit price in the same transaction that holds the stock, so the
//! billed price and the decrement observe the same snapshot.

use super::{InventoryError, InventoryLedger, StockReservation};
use crate::domain::shared::{Money, ProductId, Quantity};

/// A reservation with its unit price frozen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedReservation {
    /// Reserved product.
    pub product_id: ProductId,
    /// Reserved units.
    pub quantity: Quantity,
    /// Unit price at the instant of reservation.
    pub unit_price: Money,
}

/// Price Snapshot Resolver domain service.
pub struct PriceSnapshotResolver;

impl PriceSnapshotResolver {
    /// Freeze the current price of a reserved product.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if the product vanished and `Store` if the
    /// read fails.
    pub async fn freeze<L>(
        ledger: &mut L,
        reservation: StockReservation,
    ) -> Result<PricedReservation, InventoryError>
    where
        L: InventoryLedger + ?Sized,
    {
        let unit_price = ledger
            .current_price(reservation.product_id())
            .await?
            .ok_or_else(|| InventoryError::ProductNotFound {
                product_id: reservation.product_id().clone(),
            })?;

        Ok(PricedReservation {
            product_id: reservation.product_id().clone(),
            quantity: reservation.quantity(),
            unit_price,
        })
    }
}
