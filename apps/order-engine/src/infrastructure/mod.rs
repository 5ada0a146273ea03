//! Infrastructure Layer
//!
//! This module contains all adapters (implementations) for the ports defined
//! in the domain and application layers. Following hexagonal architecture:
//!
//! - **Driven Adapters (Outbound)**
//!   - `persistence/`: SQLite (sqlx) and in-memory stores
//!
//! - **Driver Adapters (Inbound)**
//!   - `http/`: REST API controllers

pub mod http;
pub mod persistence;
