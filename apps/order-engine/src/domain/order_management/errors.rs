//! Order management errors.

use std::fmt;

use super::value_objects::OrderStatus;
use crate::domain::inventory::InventoryError;
use crate::domain::shared::{DomainError, OrderId, ProductId, Quantity};

/// Errors that can occur while placing, reading or changing orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Malformed or missing input.
    InvalidArgument {
        /// Field with invalid value.
        field: String,
        /// Error message.
        message: String,
    },

    /// Requested product does not exist.
    ProductNotFound {
        /// Product ID.
        product_id: ProductId,
    },

    /// Order does not exist or is not visible to the requester.
    OrderNotFound {
        /// Order ID.
        order_id: OrderId,
    },

    /// Stock cannot cover a line.
    InsufficientStock {
        /// Product ID.
        product_id: ProductId,
        /// Units requested.
        requested: Quantity,
        /// Units available when the request was rejected.
        available: i64,
    },

    /// Status change not allowed from the current state.
    InvalidTransition {
        /// Current order status.
        from: OrderStatus,
        /// Attempted status.
        to: OrderStatus,
        /// Reason for failure.
        reason: String,
    },

    /// Requester lacks the privilege for the action.
    Forbidden {
        /// Action that was refused.
        action: String,
    },

    /// Persistence failure.
    Store {
        /// Underlying error message.
        message: String,
        /// Whether retrying the whole operation may succeed.
        transient: bool,
    },
}

impl OrderError {
    /// Shorthand for [`OrderError::InvalidArgument`].
    #[must_use]
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for a non-transient [`OrderError::Store`].
    #[must_use]
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            transient: false,
        }
    }

    /// Returns true if retrying the enclosing transaction may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Store { transient: true, .. })
    }

    /// Short label for metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::ProductNotFound { .. } => "product_not_found",
            Self::OrderNotFound { .. } => "order_not_found",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Forbidden { .. } => "forbidden",
            Self::Store { .. } => "store",
        }
    }
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { field, message } => {
                write!(f, "Invalid order parameter '{field}': {message}")
            }
            Self::ProductNotFound { product_id } => {
                write!(f, "Product not found: {product_id}")
            }
            Self::OrderNotFound { order_id } => {
                write!(f, "Order not found: {order_id}")
            }
            Self::InsufficientStock {
                product_id,
                requested,
                available,
            } => {
                write!(
                    f,
                    "Insufficient stock for product {product_id}: requested {requested}, available {available}"
                )
            }
            Self::InvalidTransition { from, to, reason } => {
                write!(f, "Invalid order status transition: {from} -> {to}: {reason}")
            }
            Self::Forbidden { action } => {
                write!(f, "Not allowed to {action}")
            }
            Self::Store { message, .. } => {
                write!(f, "Order store error: {message}")
            }
        }
    }
}

impl std::error::Error for OrderError {}

impl From<DomainError> for OrderError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidValue { field, message } => Self::InvalidArgument { field, message },
            other @ DomainError::InvariantViolation { .. } => Self::store(other.to_string()),
        }
    }
}

impl From<InventoryError> for OrderError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::ProductNotFound { product_id } => Self::ProductNotFound { product_id },
            InventoryError::InsufficientStock {
                product_id,
                requested,
                available,
            } => Self::InsufficientStock {
                product_id,
                requested,
                available,
            },
            InventoryError::Store { message, transient } => Self::Store { message, transient },
        }
    }
}
