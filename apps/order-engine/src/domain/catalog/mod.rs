//! Catalog Bounded Context
//!
//! The slice of the product catalog the order engine reads. Catalog
//! maintenance lives outside this service; the only writer here is the
//! startup seed used for local runs.

mod product;
mod repository;

pub use product::Product;
pub use repository::{CatalogError, ProductCatalog};
