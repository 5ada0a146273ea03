//! Event Publisher Port (Driven Port)
//!
//! Interface for publishing domain events after their transaction commits.

use async_trait::async_trait;
use tracing::info;

use crate::domain::order_management::OrderEvent;

/// Event publishing error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventPublishError {
    /// Serialization error.
    #[error("Event serialization error: {message}")]
    SerializationError {
        /// Error message.
        message: String,
    },

    /// Publishing failed.
    #[error("Event publish failed: {message}")]
    PublishFailed {
        /// Error message.
        message: String,
    },
}

/// Port for publishing domain events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisherPort: Send + Sync {
    /// Publish order events.
    async fn publish_order_events(&self, events: Vec<OrderEvent>) -> Result<(), EventPublishError>;
}

/// No-op event publisher for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisherPort for NoOpEventPublisher {
    async fn publish_order_events(
        &self,
        _events: Vec<OrderEvent>,
    ) -> Result<(), EventPublishError> {
        Ok(())
    }
}

/// Publisher that writes each event as a structured log line.
#[derive(Debug, Clone, Default)]
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisherPort for TracingEventPublisher {
    async fn publish_order_events(&self, events: Vec<OrderEvent>) -> Result<(), EventPublishError> {
        for event in events {
            let payload = serde_json::to_string(&event).map_err(|e| {
                EventPublishError::SerializationError {
                    message: e.to_string(),
                }
            })?;
            info!(
                target: "order_events",
                event_type = event.event_type(),
                order_id = %event.order_id(),
                occurred_at = %event.occurred_at(),
                payload = %payload,
                "Order event"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_management::events::{OrderDeleted, OrderEvent};
    use crate::domain::shared::{OrderId, Timestamp, UserId};

    fn deleted(id: &str) -> OrderEvent {
        OrderEvent::Deleted(OrderDeleted {
            order_id: OrderId::new(id),
            deleted_by: UserId::new("admin"),
            occurred_at: Timestamp::now(),
        })
    }

    #[tokio::test]
    async fn no_op_publisher_succeeds() {
        let publisher = NoOpEventPublisher;
        let result = publisher.publish_order_events(vec![deleted("order-1")]).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn tracing_publisher_multiple_events() {
        let publisher = TracingEventPublisher;
        let result = publisher
            .publish_order_events(vec![deleted("order-1"), deleted("order-2")])
            .await;
        assert!(result.is_ok());
    }
}
