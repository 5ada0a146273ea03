//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Aggregates**: Consistency boundaries with invariants
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Events**: Records of state transitions
//! - **Domain Services**: Stateless business logic
//! - **Repository Traits**: Persistence abstractions (implemented in adapters)
//!
//! # Bounded Contexts
//!
//! - [`catalog`]: Product read model
//! - [`inventory`]: Stock reservation and price snapshots
//! - [`order_management`]: Order aggregate and status lifecycle

pub mod catalog;
pub mod inventory;
pub mod order_management;
pub mod shared;
