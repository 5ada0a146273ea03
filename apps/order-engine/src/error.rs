//! Boundary error handling for the order engine.
//!
//! Domain errors are translated into an [`ApiError`] carrying a stable
//! [`ErrorCode`], a human-readable message and key/value context.
//!
//! # HTTP Status Codes
//!
//! | Code | HTTP | Usage |
//! |------|------|-------|
//! | `INVALID_ARGUMENT` | 400 | Malformed request, bad quantity, bad page |
//! | `UNAUTHENTICATED` | 401 | No verified identity on the request |
//! | `FORBIDDEN` | 403 | Role not allowed to perform the action |
//! | `NOT_FOUND` | 404 | Unknown product or order, or order not visible |
//! | `INSUFFICIENT_STOCK` | 409 | A line cannot be covered by available stock |
//! | `INVALID_TRANSITION` | 409 | Status move rejected by the state machine |
//! | `INTERNAL` | 500 | Store failure, timeout, exhausted retries |

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::order_management::OrderError;

/// Error codes exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invalid request format or parameters.
    InvalidArgument,
    /// Missing identity.
    Unauthenticated,
    /// Authenticated but not allowed.
    Forbidden,
    /// Product or order not found.
    NotFound,
    /// Not enough stock for a line.
    InsufficientStock,
    /// Illegal status move.
    InvalidTransition,
    /// Internal server error.
    Internal,
}

impl ErrorCode {
    /// HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InsufficientStock | Self::InvalidTransition => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wire string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// An error with context, ready to be rendered at the boundary.
#[derive(Debug, Error)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    context: Vec<(String, String)>,
}

impl ApiError {
    /// Create a new API error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Response body.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            details: self.context.iter().cloned().collect(),
        }
    }

    /// Invalid request.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    /// Missing identity.
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthenticated, message)
    }

    /// Internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::InvalidArgument { field, .. } => {
                Self::new(ErrorCode::InvalidArgument, message).with_context("field", field)
            }
            OrderError::ProductNotFound { product_id } => {
                Self::new(ErrorCode::NotFound, message).with_context("product_id", product_id.into_inner())
            }
            OrderError::OrderNotFound { order_id } => {
                Self::new(ErrorCode::NotFound, message).with_context("order_id", order_id.into_inner())
            }
            OrderError::InsufficientStock {
                product_id,
                requested,
                available,
            } => Self::new(ErrorCode::InsufficientStock, message)
                .with_context("product_id", product_id.into_inner())
                .with_context("requested", requested.to_string())
                .with_context("available", available.to_string()),
            OrderError::InvalidTransition { from, to, .. } => {
                Self::new(ErrorCode::InvalidTransition, message)
                    .with_context("from", from.as_str())
                    .with_context("to", to.as_str())
            }
            OrderError::Forbidden { .. } => Self::new(ErrorCode::Forbidden, message),
            OrderError::Store { message, .. } => {
                tracing::error!(error = %message, "Store failure");
                Self::internal("internal error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.http_status(), Json(self.to_http_response())).into_response()
    }
}

/// HTTP error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Additional details.
    pub details: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_management::OrderStatus;
    use crate::domain::shared::{OrderId, ProductId, Quantity};

    #[test]
    fn status_mapping() {
        assert_eq!(ErrorCode::InvalidArgument.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::InsufficientStock.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::InvalidTransition.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::Forbidden.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ErrorCode::Internal.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn insufficient_stock_carries_context() {
        let err = ApiError::from(OrderError::InsufficientStock {
            product_id: ProductId::new("p-1"),
            requested: Quantity::new(4).unwrap(),
            available: 3,
        });
        let body = err.to_http_response();

        assert_eq!(body.code, "INSUFFICIENT_STOCK");
        assert_eq!(body.details["product_id"], "p-1");
        assert_eq!(body.details["requested"], "4");
        assert_eq!(body.details["available"], "3");
    }

    #[test]
    fn not_found_variants_share_a_code() {
        let product = ApiError::from(OrderError::ProductNotFound {
            product_id: ProductId::new("p-9"),
        });
        let order = ApiError::from(OrderError::OrderNotFound {
            order_id: OrderId::new("o-9"),
        });
        assert_eq!(product.code(), ErrorCode::NotFound);
        assert_eq!(order.code(), ErrorCode::NotFound);
        assert_eq!(order.context()[0], ("order_id".to_string(), "o-9".to_string()));
    }

    #[test]
    fn store_errors_hide_details() {
        let err = ApiError::from(OrderError::store("disk I/O error at page 7"));
        assert_eq!(err.code(), ErrorCode::Internal);
        assert!(!err.message().contains("disk"));
    }

    #[test]
    fn transition_error_display() {
        let err = ApiError::from(OrderError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
            reason: "terminal".to_string(),
        });
        assert!(err.to_string().starts_with("[INVALID_TRANSITION]"));
    }
}
