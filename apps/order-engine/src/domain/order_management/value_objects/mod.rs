//! Order management value objects.

mod order_status;
mod payment_method;
mod requester;

pub use order_status::OrderStatus;
pub use payment_method::PaymentMethod;
pub use requester::{Requester, Role};
