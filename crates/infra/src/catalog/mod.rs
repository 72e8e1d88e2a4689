//! Catalog read path and category administration.
//!
//! Each service is generic over its store capability, so the same logic runs
//! against the in-memory fake in tests and against Postgres in production.

pub mod categories;
pub mod detail_resolver;
pub mod query_engine;

pub use categories::CategoryService;
pub use detail_resolver::DetailResolver;
pub use query_engine::QueryEngine;
