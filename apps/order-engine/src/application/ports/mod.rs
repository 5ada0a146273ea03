//! Application Ports (Driver and Driven)
//!
//! Ports define interfaces for interacting with external systems.
//! Persistence ports live with their aggregates in the domain layer.

mod event_publisher_port;

#[cfg(test)]
pub use event_publisher_port::MockEventPublisherPort;
pub use event_publisher_port::{
    EventPublishError, EventPublisherPort, NoOpEventPublisher, TracingEventPublisher,
};
