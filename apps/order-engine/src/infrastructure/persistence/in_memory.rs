//! In-memory order store for tests and local development.
//!
//! A single async mutex stands in for the database write lock: a unit of
//! work holds it from `begin` until commit or drop, edits a private copy of
//! the state and publishes that copy on commit. Dropping the unit of work
//! discards the copy, which is a rollback.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::catalog::{CatalogError, Product, ProductCatalog};
use crate::domain::inventory::{InventoryError, InventoryLedger, ReserveOutcome};
use crate::domain::order_management::{
    Order, OrderError, OrderListQuery, OrderPage, OrderRepository, OrderStatus, OrderStore,
    OrderUnitOfWork,
};
use crate::domain::shared::{Money, OrderId, ProductId, Quantity};

#[derive(Debug, Clone, Default)]
struct StoreState {
    products: HashMap<ProductId, Product>,
    orders: HashMap<OrderId, Order>,
}

/// In-memory implementation of every persistence port.
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    state: Arc<Mutex<StoreState>>,
    failing_begins: AtomicU32,
}

impl InMemoryOrderStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` calls to `begin` fail with a transient error.
    pub fn fail_next_begins(&self, count: u32) {
        self.failing_begins.store(count, Ordering::SeqCst);
    }

    /// Number of committed orders.
    pub async fn order_count(&self) -> usize {
        self.state.lock().await.orders.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn begin(&self) -> Result<Box<dyn OrderUnitOfWork>, OrderError> {
        let injected = self
            .failing_begins
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(OrderError::Store {
                message: "injected lock contention".to_string(),
                transient: true,
            });
        }

        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryUnitOfWork { guard, working }))
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderStore {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderError> {
        Ok(self.state.lock().await.orders.get(id).cloned())
    }

    async fn list(&self, query: &OrderListQuery) -> Result<OrderPage, OrderError> {
        let state = self.state.lock().await;
        let mut matching: Vec<&Order> = state
            .orders
            .values()
            .filter(|o| query.owner.as_ref().is_none_or(|owner| o.user_id() == owner))
            .filter(|o| query.status.is_none_or(|status| o.status() == status))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(a.id()))
        });

        let total_count = matching.len() as u64;
        let orders = matching
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(query.page_size as usize)
            .cloned()
            .collect();

        Ok(OrderPage {
            orders,
            total_count,
        })
    }

    async fn delete(&self, id: &OrderId) -> Result<bool, OrderError> {
        Ok(self.state.lock().await.orders.remove(id).is_some())
    }
}

#[async_trait]
impl ProductCatalog for InMemoryOrderStore {
    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.state.lock().await.products.get(id).cloned())
    }

    async fn upsert_product(&self, product: &Product) -> Result<(), CatalogError> {
        self.state
            .lock()
            .await
            .products
            .insert(product.id.clone(), product.clone());
        Ok(())
    }

    async fn set_price(&self, id: &ProductId, price: Money) -> Result<bool, CatalogError> {
        let mut state = self.state.lock().await;
        Ok(state.products.get_mut(id).is_some_and(|p| {
            p.price = price;
            true
        }))
    }
}

struct InMemoryUnitOfWork {
    guard: OwnedMutexGuard<StoreState>,
    working: StoreState,
}

#[async_trait]
impl InventoryLedger for InMemoryUnitOfWork {
    async fn try_reserve(
        &mut self,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<ReserveOutcome, InventoryError> {
        let Some(product) = self.working.products.get_mut(product_id) else {
            return Ok(ReserveOutcome::UnknownProduct);
        };
        match product.available.checked_take(quantity) {
            Some(remaining) => {
                product.available = remaining;
                Ok(ReserveOutcome::Reserved)
            }
            None => Ok(ReserveOutcome::Insufficient {
                available: product.available,
            }),
        }
    }

    async fn current_price(
        &mut self,
        product_id: &ProductId,
    ) -> Result<Option<Money>, InventoryError> {
        Ok(self.working.products.get(product_id).map(|p| p.price))
    }

    async fn restock(
        &mut self,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<(), InventoryError> {
        if let Some(product) = self.working.products.get_mut(product_id) {
            product.available = product.available.restock(quantity);
        }
        Ok(())
    }
}

#[async_trait]
impl OrderUnitOfWork for InMemoryUnitOfWork {
    async fn load_order(&mut self, id: &OrderId) -> Result<Option<Order>, OrderError> {
        Ok(self.working.orders.get(id).cloned())
    }

    async fn insert_order(&mut self, order: &Order) -> Result<(), OrderError> {
        if self.working.orders.contains_key(order.id()) {
            return Err(OrderError::store(format!("duplicate order id {}", order.id())));
        }
        self.working.orders.insert(order.id().clone(), order.clone());
        Ok(())
    }

    async fn compare_and_set_status(
        &mut self,
        order: &Order,
        expected: OrderStatus,
    ) -> Result<bool, OrderError> {
        match self.working.orders.get_mut(order.id()) {
            Some(stored) if stored.status() == expected => {
                *stored = order.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn commit(mut self: Box<Self>) -> Result<(), OrderError> {
        *self.guard = std::mem::take(&mut self.working);
        Ok(())
    }
}
