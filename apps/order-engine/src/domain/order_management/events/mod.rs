//! Domain events for order management.
//!
//! Events are recorded by the aggregate and published after commit.

use serde::{Deserialize, Serialize};

use super::value_objects::OrderStatus;
use crate::domain::shared::{Money, OrderId, Timestamp, UserId};

/// All possible order events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEvent {
    /// Order placed and stock reserved.
    Placed(OrderPlaced),
    /// Status changed.
    StatusChanged(OrderStatusChanged),
    /// Order removed by an administrator.
    Deleted(OrderDeleted),
}

impl OrderEvent {
    /// Get the order ID for this event.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        match self {
            Self::Placed(e) => &e.order_id,
            Self::StatusChanged(e) => &e.order_id,
            Self::Deleted(e) => &e.order_id,
        }
    }

    /// Get the timestamp when this event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> Timestamp {
        match self {
            Self::Placed(e) => e.occurred_at,
            Self::StatusChanged(e) => e.occurred_at,
            Self::Deleted(e) => e.occurred_at,
        }
    }

    /// Get the event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Placed(_) => "ORDER_PLACED",
            Self::StatusChanged(_) => "ORDER_STATUS_CHANGED",
            Self::Deleted(_) => "ORDER_DELETED",
        }
    }
}

/// Event: order placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    /// Order ID.
    pub order_id: OrderId,
    /// Owning user.
    pub user_id: UserId,
    /// Order total.
    pub total: Money,
    /// Number of line items.
    pub line_count: usize,
    /// When it occurred.
    pub occurred_at: Timestamp,
}

/// Event: status changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChanged {
    /// Order ID.
    pub order_id: OrderId,
    /// Previous status.
    pub from: OrderStatus,
    /// New status.
    pub to: OrderStatus,
    /// Who made the change.
    pub changed_by: UserId,
    /// When it occurred.
    pub occurred_at: Timestamp,
}

/// Event: order deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDeleted {
    /// Order ID.
    pub order_id: OrderId,
    /// Administrator who deleted it.
    pub deleted_by: UserId,
    /// When it occurred.
    pub occurred_at: Timestamp,
}
