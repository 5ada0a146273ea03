//! Delete Order Use Case

use std::sync::Arc;

use tracing::{info, instrument};

use super::publish_after_commit;
use crate::application::ports::EventPublisherPort;
use crate::domain::order_management::events::OrderDeleted;
use crate::domain::order_management::{OrderError, OrderEvent, OrderRepository, Requester};
use crate::domain::shared::{OrderId, Timestamp};
use crate::observability::metrics;

/// Admin-only hard delete of an order and its line items.
///
/// Stock is never returned on delete.
pub struct DeleteOrderUseCase<R, E>
where
    R: OrderRepository + ?Sized,
    E: EventPublisherPort + ?Sized,
{
    order_repo: Arc<R>,
    event_publisher: Arc<E>,
}

impl<R, E> DeleteOrderUseCase<R, E>
where
    R: OrderRepository + ?Sized,
    E: EventPublisherPort + ?Sized,
{
    /// Create a new `DeleteOrderUseCase`.
    pub const fn new(order_repo: Arc<R>, event_publisher: Arc<E>) -> Self {
        Self {
            order_repo,
            event_publisher,
        }
    }

    /// Delete `order_id`.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-admins, `OrderNotFound` if nothing was
    /// deleted and `Store` on persistence failure.
    #[instrument(name = "order.delete", skip(self, requester), fields(user_id = %requester.user_id))]
    pub async fn execute(&self, requester: &Requester, order_id: &OrderId) -> Result<(), OrderError> {
        if !requester.is_admin() {
            return Err(OrderError::Forbidden {
                action: "delete orders".to_string(),
            });
        }

        if !self.order_repo.delete(order_id).await? {
            return Err(OrderError::OrderNotFound {
                order_id: order_id.clone(),
            });
        }

        metrics::record_order_deleted();
        info!(order_id = %order_id, "Order deleted");

        let event = OrderEvent::Deleted(OrderDeleted {
            order_id: order_id.clone(),
            deleted_by: requester.user_id.clone(),
            occurred_at: Timestamp::now(),
        });
        publish_after_commit(self.event_publisher.as_ref(), vec![event]).await;
        Ok(())
    }
}
