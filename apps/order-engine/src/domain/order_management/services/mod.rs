//! Order management domain services.

mod order_builder;
mod order_state_machine;

pub use order_builder::OrderBuilder;
pub use order_state_machine::{OrderStateMachine, TransitionPolicy};
