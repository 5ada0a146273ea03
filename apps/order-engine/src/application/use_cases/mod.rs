//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod delete_order;
mod place_order;
mod query_orders;
mod transition_status;

pub use delete_order::DeleteOrderUseCase;
pub use place_order::{PlaceOrderUseCase, PlacementSettings};
pub use query_orders::{DEFAULT_PAGE_SIZE, OrderQueryUseCase};
pub use transition_status::{LifecycleSettings, TransitionOrderStatusUseCase};

use crate::application::ports::EventPublisherPort;
use crate::domain::order_management::OrderEvent;

/// Hand committed events to the publisher. Failures are logged only; the
/// state they describe is already durable.
async fn publish_after_commit<E>(publisher: &E, events: Vec<OrderEvent>)
where
    E: EventPublisherPort + ?Sized,
{
    if events.is_empty() {
        return;
    }
    if let Err(e) = publisher.publish_order_events(events).await {
        tracing::error!(error = %e, "Failed to publish order events");
    }
}
