//! Order line item entity.

use serde::{Deserialize, Serialize};

use crate::domain::inventory::PricedReservation;
use crate::domain::order_management::errors::OrderError;
use crate::domain::shared::{DomainError, LineItemId, Money, ProductId, Quantity};

/// One (product, quantity, frozen unit price) entry within an order.
///
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    id: LineItemId,
    product_id: ProductId,
    quantity: Quantity,
    unit_price: Money,
    line_total: Money,
}

impl LineItem {
    /// Create a line item from a priced reservation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `unit_price * quantity` overflows.
    pub fn from_reservation(reservation: PricedReservation) -> Result<Self, OrderError> {
        let line_total = reservation
            .unit_price
            .checked_mul(reservation.quantity)
            .ok_or_else(|| {
                OrderError::invalid(
                    "items",
                    format!(
                        "line total for product '{}' is out of range",
                        reservation.product_id
                    ),
                )
            })?;
        Ok(Self {
            id: LineItemId::generate(),
            product_id: reservation.product_id,
            quantity: reservation.quantity,
            unit_price: reservation.unit_price,
            line_total,
        })
    }

    /// Rebuild a stored line item.
    ///
    /// # Errors
    ///
    /// Returns error if `unit_price * quantity` overflows.
    pub fn reconstitute(
        id: LineItemId,
        product_id: ProductId,
        quantity: Quantity,
        unit_price: Money,
    ) -> Result<Self, DomainError> {
        let line_total = unit_price.checked_mul(quantity).ok_or_else(|| {
            DomainError::invalid(
                "line_total",
                format!("{} x {quantity} is out of range", unit_price.amount()),
            )
        })?;
        Ok(Self {
            id,
            product_id,
            quantity,
            unit_price,
            line_total,
        })
    }

    /// Line item ID.
    #[must_use]
    pub const fn id(&self) -> &LineItemId {
        &self.id
    }

    /// Product ordered.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Units ordered.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Unit price snapshot.
    #[must_use]
    pub const fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// `unit_price * quantity`, exact.
    #[must_use]
    pub const fn line_total(&self) -> Money {
        self.line_total
    }
}
