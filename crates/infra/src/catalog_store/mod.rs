//! Catalog store boundary.
//!
//! This module defines the capability contract the catalog read path needs
//! from persistence (count, page fetch, lookup by code), plus the category
//! write contract, without making any storage assumptions.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;
pub use r#trait::{CatalogStore, CategoryStore, StoreError};
