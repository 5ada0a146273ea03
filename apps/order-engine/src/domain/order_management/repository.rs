//! Order Repository Traits
//!
//! Persistence abstractions for orders. Implemented by adapters in the
//! infrastructure layer.

use async_trait::async_trait;

use super::aggregate::Order;
use super::errors::OrderError;
use super::value_objects::OrderStatus;
use crate::domain::inventory::InventoryLedger;
use crate::domain::shared::{OrderId, UserId};

/// One open write transaction.
///
/// Dropping it without calling [`OrderUnitOfWork::commit`] rolls back every
/// write made through it, including stock reservations.
#[async_trait]
pub trait OrderUnitOfWork: InventoryLedger {
    /// Read an order, with line items, inside this transaction.
    async fn load_order(&mut self, id: &OrderId) -> Result<Option<Order>, OrderError>;

    /// Insert an order header and all of its line items.
    async fn insert_order(&mut self, order: &Order) -> Result<(), OrderError>;

    /// Write the order's current status and `updated_at`, but only if the
    /// stored status is still `expected`. Returns false if it changed.
    async fn compare_and_set_status(
        &mut self,
        order: &Order,
        expected: OrderStatus,
    ) -> Result<bool, OrderError>;

    /// Make every write durable.
    async fn commit(self: Box<Self>) -> Result<(), OrderError>;
}

/// Factory for write transactions.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Open a write transaction.
    async fn begin(&self) -> Result<Box<dyn OrderUnitOfWork>, OrderError>;
}

/// Filter and page for listing orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderListQuery {
    /// Restrict to one owner; `None` lists every user's orders.
    pub owner: Option<UserId>,
    /// Restrict to one status.
    pub status: Option<OrderStatus>,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub page_size: u32,
}

impl OrderListQuery {
    /// Rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// One page of orders, newest first.
#[derive(Debug, Clone)]
pub struct OrderPage {
    /// Orders on this page.
    pub orders: Vec<Order>,
    /// Matching orders across all pages.
    pub total_count: u64,
}

/// Read and delete access to committed orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Find an order by ID, with line items.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderError>;

    /// List orders matching `query`, newest first.
    async fn list(&self, query: &OrderListQuery) -> Result<OrderPage, OrderError>;

    /// Delete an order and its line items. Returns false if it did not exist.
    async fn delete(&self, id: &OrderId) -> Result<bool, OrderError>;
}
