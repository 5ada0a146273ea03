//! Order Aggregate Builder
//!
//! Reserves stock and freezes prices for every requested line inside the
//! caller's transaction, then assembles the `PENDING` order.

use tracing::debug;

use crate::domain::inventory::{InventoryLedger, PriceSnapshotResolver, PricedReservation, StockGuard};
use crate::domain::order_management::aggregate::{LineItem, Order, ValidatedPlacement};
use crate::domain::order_management::errors::OrderError;

/// Order Aggregate Builder domain service.
pub struct OrderBuilder;

impl OrderBuilder {
    /// Reserve, price and assemble an order.
    ///
    /// Rows are touched in product-id order (ties in request order) so two
    /// concurrent multi-line placements never lock products in opposite
    /// orders. Line items keep request order.
    ///
    /// On error the ledger may hold partial reservations; the caller must
    /// roll the transaction back.
    ///
    /// # Errors
    ///
    /// Returns the first `ProductNotFound`, `InsufficientStock` or `Store`
    /// error encountered, or `InvalidArgument` if a line or the order total
    /// is out of range.
    pub async fn build<L>(ledger: &mut L, placement: &ValidatedPlacement) -> Result<Order, OrderError>
    where
        L: InventoryLedger + ?Sized,
    {
        let lines = placement.lines();
        let mut sequence: Vec<usize> = (0..lines.len()).collect();
        sequence.sort_by(|&a, &b| lines[a].0.cmp(&lines[b].0));

        let mut priced: Vec<Option<PricedReservation>> = vec![None; lines.len()];
        for idx in sequence {
            let (product_id, quantity) = &lines[idx];
            let reservation = StockGuard::reserve(ledger, product_id, *quantity).await?;
            priced[idx] = Some(PriceSnapshotResolver::freeze(ledger, reservation).await?);
        }

        let items: Vec<LineItem> = priced
            .into_iter()
            .flatten()
            .map(LineItem::from_reservation)
            .collect::<Result<_, _>>()?;

        let order = Order::place(placement, items)?;
        debug!(
            order_id = %order.id(),
            total = %order.total(),
            lines = order.line_items().len(),
            "Order assembled"
        );
        Ok(order)
    }
}
