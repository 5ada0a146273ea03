//! HTTP/REST API adapter.
//!
//! Inbound adapter implementing REST endpoints that delegate to application use cases.

mod controller;
pub mod identity;
mod response;

pub use controller::{AppState, create_router};
pub use identity::Identity;
pub use response::*;
