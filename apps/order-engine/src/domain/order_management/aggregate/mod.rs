//! Order aggregate.

mod line_item;
mod order;

pub use line_item::LineItem;
pub use order::{Order, PlaceOrderCommand, ReconstitutedOrderParams, RequestedLine, ValidatedPlacement};
