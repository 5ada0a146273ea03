//! Order State Machine Service
//!
//! Validates status transitions of a persisted order.

use crate::domain::order_management::errors::OrderError;
use crate::domain::order_management::value_objects::OrderStatus;

/// Operator-configurable relaxations of the transition table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionPolicy {
    /// Permit forward jumps along the fulfilment path (e.g. `PENDING -> DELIVERED`).
    pub allow_status_skip: bool,
}

/// Order State Machine for validating transitions.
pub struct OrderStateMachine;

impl OrderStateMachine {
    /// Check if a transition is in the base table.
    #[must_use]
    pub const fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            (OrderStatus::Pending, OrderStatus::Paid)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Paid, OrderStatus::Shipped)
                | (OrderStatus::Paid, OrderStatus::Cancelled)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
        )
    }

    /// Check if a transition is allowed under `policy`.
    #[must_use]
    pub fn is_allowed(from: OrderStatus, to: OrderStatus, policy: TransitionPolicy) -> bool {
        Self::is_valid_transition(from, to)
            || (policy.allow_status_skip && Self::is_forward_skip(from, to))
    }

    /// Validate a transition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the target is not reachable from `from`.
    pub fn validate_transition(
        from: OrderStatus,
        to: OrderStatus,
        policy: TransitionPolicy,
    ) -> Result<(), OrderError> {
        if Self::is_allowed(from, to, policy) {
            Ok(())
        } else {
            Err(OrderError::InvalidTransition {
                from,
                to,
                reason: Self::transition_error_reason(from, to),
            })
        }
    }

    /// Get a human-readable reason for an invalid transition.
    #[must_use]
    pub fn transition_error_reason(from: OrderStatus, to: OrderStatus) -> String {
        if from == to {
            return format!("Order is already {to}");
        }
        match (from, to) {
            (OrderStatus::Delivered, _) => {
                format!("Order was delivered, cannot transition to {to}")
            }
            (OrderStatus::Cancelled, _) => {
                format!("Order is cancelled, cannot transition to {to}")
            }
            (OrderStatus::Shipped, OrderStatus::Cancelled) => {
                "Order has shipped and can no longer be cancelled".to_string()
            }
            (OrderStatus::Pending, OrderStatus::Shipped | OrderStatus::Delivered) => {
                format!("Order must be paid before it can be {to}")
            }
            (OrderStatus::Paid, OrderStatus::Delivered) => {
                "Order must be shipped before it can be delivered".to_string()
            }
            _ => format!("Invalid transition from {from} to {to}"),
        }
    }

    /// Get all allowed next states from a given state.
    #[must_use]
    pub fn valid_next_states(from: OrderStatus, policy: TransitionPolicy) -> Vec<OrderStatus> {
        OrderStatus::ALL
            .into_iter()
            .filter(|to| Self::is_allowed(from, *to, policy))
            .collect()
    }

    fn is_forward_skip(from: OrderStatus, to: OrderStatus) -> bool {
        match (from.fulfilment_rank(), to.fulfilment_rank()) {
            (Some(a), Some(b)) => !from.is_terminal() && b > a,
            _ => false,
        }
    }
}
