//! Order Management Bounded Context
//!
//! Owns the Order aggregate from placement through its status lifecycle.
//!
//! - [`aggregate`]: `Order` root and `LineItem` entity
//! - [`services`]: aggregate builder and status state machine
//! - [`repository`]: persistence ports

pub mod aggregate;
pub mod errors;
pub mod events;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use aggregate::{LineItem, Order, PlaceOrderCommand, RequestedLine, ValidatedPlacement};
pub use errors::OrderError;
pub use events::OrderEvent;
pub use repository::{OrderListQuery, OrderPage, OrderRepository, OrderStore, OrderUnitOfWork};
pub use services::{OrderBuilder, OrderStateMachine, TransitionPolicy};
pub use value_objects::{OrderStatus, PaymentMethod, Requester, Role};
