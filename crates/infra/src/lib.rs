//! Infrastructure layer: catalog stores, query services, configuration.

pub mod catalog;
pub mod catalog_store;
pub mod config;
pub mod fixtures;
