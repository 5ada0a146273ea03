// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Order Engine - Rust Core Library
//!
//! Transactional order placement and inventory engine for the storefront.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregates, value objects, domain events)
//!   - `catalog`: Product read model and catalog port
//!   - `inventory`: Stock reservation and price snapshots
//!   - `order_management`: Order aggregate, status lifecycle, unit of work
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for external systems (`EventPublisherPort`)
//!   - `use_cases`: `PlaceOrder`, `OrderQuery`, `TransitionOrderStatus`, `DeleteOrder`
//!   - `retry`: Bounded retry of transient store failures
//!   - `dto`: Data transfer objects for API boundaries
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: SQLite and in-memory order stores
//!   - `http`: REST API
//!
//! Placement reserves stock, snapshots prices and writes the order inside one
//! unit of work, so a failure anywhere leaves stock untouched.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// YAML configuration with environment interpolation.
pub mod config;

/// API error model.
pub mod error;

/// Prometheus metrics.
pub mod observability;

/// Logging and OpenTelemetry setup.
pub mod telemetry;

// =============================================================================
// Re-exports from Clean Architecture
// =============================================================================

// Domain re-exports
pub use domain::catalog::{CatalogError, Product, ProductCatalog};
pub use domain::inventory::{InventoryError, InventoryLedger};
pub use domain::order_management::{
    LineItem, Order, OrderError, OrderStatus, OrderStore, PaymentMethod, PlaceOrderCommand,
    Requester, Role,
};
pub use domain::shared::{Money, OrderId, ProductId, Quantity, Timestamp, UserId};

// Application re-exports
pub use application::dto::{OrderDto, OrderPageDto, PlaceOrderRequestDto};
pub use application::ports::{EventPublisherPort, NoOpEventPublisher, TracingEventPublisher};
pub use application::use_cases::{
    DeleteOrderUseCase, OrderQueryUseCase, PlaceOrderUseCase, TransitionOrderStatusUseCase,
};

// Infrastructure re-exports
pub use error::{ApiError, ErrorCode};
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::persistence::{InMemoryOrderStore, SqliteOrderStore, SqliteSettings};
