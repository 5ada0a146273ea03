//! Order Aggregate Root
//!
//! An order is created exactly once by placement, with its line items and
//! total fixed at that moment. Afterwards only its status changes.

use serde::{Deserialize, Serialize};

use super::LineItem;
use crate::domain::order_management::errors::OrderError;
use crate::domain::order_management::events::{OrderEvent, OrderPlaced, OrderStatusChanged};
use crate::domain::order_management::services::{OrderStateMachine, TransitionPolicy};
use crate::domain::order_management::value_objects::{OrderStatus, PaymentMethod, Requester};
use crate::domain::shared::{DomainError, Money, OrderId, ProductId, Quantity, Timestamp, UserId};

/// Parameters for reconstituting an Order from storage.
///
/// No domain events are generated during reconstitution.
#[derive(Debug, Clone)]
pub struct ReconstitutedOrderParams {
    /// Order identifier.
    pub id: OrderId,
    /// Owning user.
    pub user_id: UserId,
    /// Line items in placement order.
    pub line_items: Vec<LineItem>,
    /// Stored total.
    pub total: Money,
    /// Current status.
    pub status: OrderStatus,
    /// Payment method tag.
    pub payment_method: PaymentMethod,
    /// Shipping address snapshot.
    pub shipping_address: String,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last update timestamp.
    pub updated_at: Timestamp,
}

/// One requested (product, quantity) pair, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedLine {
    /// Product to order.
    pub product_id: ProductId,
    /// Raw requested quantity; validated to be positive.
    pub quantity: i64,
}

impl RequestedLine {
    /// Convenience constructor.
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Command to place a new order.
#[derive(Debug, Clone)]
pub struct PlaceOrderCommand {
    /// Owning user.
    pub user_id: UserId,
    /// Requested lines. Duplicated products stay separate lines.
    pub lines: Vec<RequestedLine>,
    /// Shipping address snapshot.
    pub shipping_address: String,
    /// Payment method tag.
    pub payment_method: PaymentMethod,
}

impl PlaceOrderCommand {
    /// Validate the command before any transaction is opened.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if there are no lines, too many lines, a
    /// non-positive quantity, a blank product ID or a blank shipping address.
    pub fn validate(&self, max_line_items: usize) -> Result<ValidatedPlacement, OrderError> {
        if self.lines.is_empty() {
            return Err(OrderError::invalid("items", "order must contain at least one item"));
        }
        if self.lines.len() > max_line_items {
            return Err(OrderError::invalid(
                "items",
                format!(
                    "order has {} items, maximum is {max_line_items}",
                    self.lines.len()
                ),
            ));
        }

        let shipping_address = self.shipping_address.trim();
        if shipping_address.is_empty() {
            return Err(OrderError::invalid(
                "shipping_address",
                "shipping address is required",
            ));
        }

        let lines = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                if line.product_id.as_str().trim().is_empty() {
                    return Err(OrderError::invalid(
                        &format!("items[{i}].product_id"),
                        "product id is required",
                    ));
                }
                let quantity = Quantity::try_from_i64(line.quantity).map_err(|e| match e {
                    DomainError::InvalidValue { message, .. } => {
                        OrderError::invalid(&format!("items[{i}].quantity"), message)
                    }
                    other => OrderError::from(other),
                })?;
                Ok((line.product_id.clone(), quantity))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidatedPlacement {
            user_id: self.user_id.clone(),
            lines,
            shipping_address: shipping_address.to_string(),
            payment_method: self.payment_method,
        })
    }
}

/// A placement request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPlacement {
    user_id: UserId,
    lines: Vec<(ProductId, Quantity)>,
    shipping_address: String,
    payment_method: PaymentMethod,
}

impl ValidatedPlacement {
    /// Owning user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Lines in request order.
    #[must_use]
    pub fn lines(&self) -> &[(ProductId, Quantity)] {
        &self.lines
    }

    /// Trimmed shipping address.
    #[must_use]
    pub fn shipping_address(&self) -> &str {
        &self.shipping_address
    }

    /// Payment method tag.
    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }
}

/// Order Aggregate Root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    line_items: Vec<LineItem>,
    total: Money,
    status: OrderStatus,
    payment_method: PaymentMethod,
    shipping_address: String,
    #[serde(skip)]
    events: Vec<OrderEvent>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Order {
    /// Create a `PENDING` order from priced line items.
    ///
    /// The total is computed here, once. Generates an `OrderPlaced` event.
    ///
    /// # Errors
    ///
    /// Returns error if `line_items` does not match the placement's lines.
    pub fn place(
        placement: &ValidatedPlacement,
        line_items: Vec<LineItem>,
    ) -> Result<Self, OrderError> {
        let matches_request = line_items.len() == placement.lines.len()
            && line_items
                .iter()
                .zip(&placement.lines)
                .all(|(item, (pid, qty))| item.product_id() == pid && item.quantity() == *qty);
        if !matches_request {
            return Err(OrderError::from(DomainError::InvariantViolation {
                aggregate: "Order".to_string(),
                invariant: "line items mirror requested lines".to_string(),
                state: format!(
                    "requested={}, built={}",
                    placement.lines.len(),
                    line_items.len()
                ),
            }));
        }

        let id = OrderId::generate();
        let now = Timestamp::now();
        let total = Money::checked_sum(line_items.iter().map(LineItem::line_total))
            .ok_or_else(|| OrderError::invalid("items", "order total is out of range"))?;

        let mut order = Self {
            id: id.clone(),
            user_id: placement.user_id.clone(),
            line_items,
            total,
            status: OrderStatus::Pending,
            payment_method: placement.payment_method,
            shipping_address: placement.shipping_address.clone(),
            events: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        order.events.push(OrderEvent::Placed(OrderPlaced {
            order_id: id,
            user_id: order.user_id.clone(),
            total,
            line_count: order.line_items.len(),
            occurred_at: now,
        }));

        Ok(order)
    }

    /// Reconstitute an order from stored state (no events generated).
    #[must_use]
    pub fn reconstitute(params: ReconstitutedOrderParams) -> Self {
        Self {
            id: params.id,
            user_id: params.user_id,
            line_items: params.line_items,
            total: params.total,
            status: params.status,
            payment_method: params.payment_method,
            shipping_address: params.shipping_address,
            events: Vec::new(),
            created_at: params.created_at,
            updated_at: params.updated_at,
        }
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the order ID.
    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.id
    }

    /// Get the owning user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Get the line items in placement order.
    #[must_use]
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Get the total fixed at placement.
    #[must_use]
    pub const fn total(&self) -> Money {
        self.total
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Get the payment method tag.
    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Get the shipping address snapshot.
    #[must_use]
    pub fn shipping_address(&self) -> &str {
        &self.shipping_address
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Get the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Check `total == sum(unit_price * quantity)`.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if the stored total disagrees with the lines.
    pub fn verify_total(&self) -> Result<(), DomainError> {
        let expected = Money::checked_sum(self.line_items.iter().map(LineItem::line_total));
        if expected == Some(self.total) {
            return Ok(());
        }
        let sum = expected.map_or_else(|| "out of range".to_string(), |m| m.to_string());
        Err(DomainError::InvariantViolation {
            aggregate: "Order".to_string(),
            invariant: "total = sum(unit_price * quantity)".to_string(),
            state: format!("order={}, total={}, sum={sum}", self.id, self.total),
        })
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Move the order to `target` on behalf of `requester`.
    ///
    /// Administrators may apply any transition `policy` allows. A customer may
    /// only cancel their own `PENDING` order. Returns the previous status.
    /// Generates an `OrderStatusChanged` event.
    ///
    /// # Errors
    ///
    /// - `OrderNotFound` if the requester cannot see this order
    /// - `Forbidden` if a customer asks for anything but self-cancellation
    /// - `InvalidTransition` if the state machine rejects the move
    pub fn transition(
        &mut self,
        target: OrderStatus,
        requester: &Requester,
        policy: TransitionPolicy,
    ) -> Result<OrderStatus, OrderError> {
        if !requester.can_see(&self.user_id) {
            return Err(OrderError::OrderNotFound {
                order_id: self.id.clone(),
            });
        }
        if !requester.is_admin()
            && !(target == OrderStatus::Cancelled && self.status == OrderStatus::Pending)
        {
            return Err(OrderError::Forbidden {
                action: format!("set order status to {target}"),
            });
        }

        OrderStateMachine::validate_transition(self.status, target, policy)?;

        let from = self.status;
        self.status = target;
        self.updated_at = Timestamp::now().max(self.created_at);

        self.events.push(OrderEvent::StatusChanged(OrderStatusChanged {
            order_id: self.id.clone(),
            from,
            to: target,
            changed_by: requester.user_id.clone(),
            occurred_at: self.updated_at,
        }));

        Ok(from)
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Drain accumulated domain events.
    pub fn drain_events(&mut self) -> Vec<OrderEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get pending events without draining.
    #[must_use]
    pub fn pending_events(&self) -> &[OrderEvent] {
        &self.events
    }
}
