//! Transition Order Status Use Case

use std::sync::Arc;

use tracing::{info, instrument};

use super::publish_after_commit;
use crate::application::dto::OrderDto;
use crate::application::ports::EventPublisherPort;
use crate::application::retry::{TransactionRetryPolicy, with_transaction_retry};
use crate::domain::inventory::StockGuard;
use crate::domain::order_management::{
    Order, OrderError, OrderStatus, OrderStore, Requester, TransitionPolicy,
};
use crate::domain::shared::OrderId;
use crate::observability::metrics;

/// Lifecycle rules.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LifecycleSettings {
    /// Which moves the state machine allows.
    pub policy: TransitionPolicy,
    /// Return line item stock when an order is cancelled.
    pub restock_on_cancel: bool,
    /// Retry policy for transient store failures.
    pub retry: TransactionRetryPolicy,
}

/// Use case for moving an order through its lifecycle.
///
/// The status is re-read and written inside one write transaction, with a
/// compare-and-set on the previous status.
pub struct TransitionOrderStatusUseCase<S, E>
where
    S: OrderStore + ?Sized,
    E: EventPublisherPort + ?Sized,
{
    store: Arc<S>,
    event_publisher: Arc<E>,
    settings: LifecycleSettings,
}

impl<S, E> TransitionOrderStatusUseCase<S, E>
where
    S: OrderStore + ?Sized,
    E: EventPublisherPort + ?Sized,
{
    /// Create a new `TransitionOrderStatusUseCase`.
    pub const fn new(store: Arc<S>, event_publisher: Arc<E>, settings: LifecycleSettings) -> Self {
        Self {
            store,
            event_publisher,
            settings,
        }
    }

    /// Move `order_id` to `target` on behalf of `requester`.
    ///
    /// # Errors
    ///
    /// - `OrderNotFound` if the order is missing or not visible to the requester
    /// - `Forbidden` if a customer asks for anything but cancelling their pending order
    /// - `InvalidTransition` if the move is illegal or lost a concurrent race
    /// - `Store` on persistence failure
    #[instrument(
        name = "order.transition",
        skip(self, requester),
        fields(user_id = %requester.user_id, target = %target)
    )]
    pub async fn execute(
        &self,
        requester: &Requester,
        order_id: &OrderId,
        target: OrderStatus,
    ) -> Result<OrderDto, OrderError> {
        let (mut order, from) =
            with_transaction_retry(&self.settings.retry, "transition_status", || {
                self.transition_once(requester, order_id, target)
            })
            .await?;

        metrics::record_status_transition(from.as_str(), target.as_str());
        info!(order_id = %order_id, from = %from, to = %target, "Order status changed");

        let dto = OrderDto::from_order(&order);
        publish_after_commit(self.event_publisher.as_ref(), order.drain_events()).await;
        Ok(dto)
    }

    async fn transition_once(
        &self,
        requester: &Requester,
        order_id: &OrderId,
        target: OrderStatus,
    ) -> Result<(Order, OrderStatus), OrderError> {
        let mut uow = self.store.begin().await?;

        let mut order = uow
            .load_order(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound {
                order_id: order_id.clone(),
            })?;

        let from = order.transition(target, requester, self.settings.policy)?;

        if !uow.compare_and_set_status(&order, from).await? {
            return Err(OrderError::InvalidTransition {
                from,
                to: target,
                reason: "status changed concurrently".to_string(),
            });
        }

        if target == OrderStatus::Cancelled && self.settings.restock_on_cancel {
            for item in order.line_items() {
                StockGuard::release(uow.as_mut(), item.product_id(), item.quantity()).await?;
            }
        }

        uow.commit().await?;
        Ok((order, from))
    }
}
