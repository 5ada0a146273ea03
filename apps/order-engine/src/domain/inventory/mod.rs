//! Inventory Bounded Context
//!
//! Guards product stock during order placement:
//!
//! - [`StockGuard`]: atomic check-and-decrement of available quantity
//! - [`PriceSnapshotResolver`]: freezes the unit price once stock is held
//!
//! Both operate on an [`InventoryLedger`], which is always scoped to the
//! enclosing placement transaction.

mod errors;
mod ledger;
mod price_snapshot;
mod stock_guard;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::InventoryError;
pub use ledger::{InventoryLedger, ReserveOutcome};
pub use price_snapshot::{PriceSnapshotResolver, PricedReservation};
pub use stock_guard::{StockGuard, StockReservation};
