//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for interacting with external systems
//! - **Use Cases**: Placement, queries, status transitions, deletion
//! - **DTOs**: Data transfer objects for API boundaries
//! - **Retry**: Bounded retry of store transactions

pub mod dto;
pub mod ports;
pub mod retry;
pub mod use_cases;

pub use dto::*;
pub use ports::*;
pub use retry::{TransactionRetryPolicy, with_transaction_retry};
pub use use_cases::*;
