//! Order DTOs

use serde::{Deserialize, Serialize};

use crate::domain::order_management::{
    LineItem, Order, OrderPage, OrderStatus, PaymentMethod, PlaceOrderCommand, RequestedLine,
};
use crate::domain::shared::{Money, Timestamp, UserId};

/// One requested line in a placement request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderItemDto {
    /// Product ID.
    pub product_id: String,
    /// Requested units. Signed so that non-positive input reaches validation.
    pub quantity: i64,
}

/// DTO for placing an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceOrderRequestDto {
    /// Requested lines.
    #[serde(default)]
    pub items: Vec<PlaceOrderItemDto>,
    /// Shipping address.
    #[serde(default)]
    pub shipping_address: String,
    /// Payment method; cash on delivery when omitted.
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl PlaceOrderRequestDto {
    /// Convert to a domain command for `user_id`.
    #[must_use]
    pub fn into_command(self, user_id: UserId) -> PlaceOrderCommand {
        PlaceOrderCommand {
            user_id,
            lines: self
                .items
                .into_iter()
                .map(|item| RequestedLine::new(item.product_id, item.quantity))
                .collect(),
            shipping_address: self.shipping_address,
            payment_method: self.payment_method,
        }
    }
}

/// DTO for listing orders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOrdersRequestDto {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
    /// Status filter.
    pub status: Option<OrderStatus>,
}

/// DTO for a status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionStatusRequestDto {
    /// Target status.
    pub status: OrderStatus,
}

/// DTO representing a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemDto {
    /// Line item ID.
    pub id: String,
    /// Product ID.
    pub product_id: String,
    /// Units.
    pub quantity: u32,
    /// Frozen unit price.
    pub unit_price: Money,
    /// `unit_price * quantity`.
    pub line_total: Money,
}

impl LineItemDto {
    /// Create from domain LineItem.
    #[must_use]
    pub fn from_line_item(item: &LineItem) -> Self {
        Self {
            id: item.id().to_string(),
            product_id: item.product_id().to_string(),
            quantity: item.quantity().value(),
            unit_price: item.unit_price(),
            line_total: item.line_total(),
        }
    }
}

/// DTO representing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDto {
    /// Order ID.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Status.
    pub status: OrderStatus,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Shipping address snapshot.
    pub shipping_address: String,
    /// Total fixed at placement.
    pub total: Money,
    /// Line items in placement order.
    pub items: Vec<LineItemDto>,
    /// Created at.
    pub created_at: Timestamp,
    /// Updated at.
    pub updated_at: Timestamp,
}

impl OrderDto {
    /// Create from domain Order.
    #[must_use]
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id().to_string(),
            user_id: order.user_id().to_string(),
            status: order.status(),
            payment_method: order.payment_method(),
            shipping_address: order.shipping_address().to_string(),
            total: order.total(),
            items: order
                .line_items()
                .iter()
                .map(LineItemDto::from_line_item)
                .collect(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
        }
    }
}

/// DTO for one page of orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPageDto {
    /// Orders on this page, newest first.
    pub orders: Vec<OrderDto>,
    /// Matching orders across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl OrderPageDto {
    /// Create from a domain page.
    #[must_use]
    pub fn from_page(page: &OrderPage, page_number: u32, limit: u32) -> Self {
        Self {
            orders: page.orders.iter().map(OrderDto::from_order).collect(),
            total: page.total_count,
            page: page_number,
            limit,
        }
    }
}
