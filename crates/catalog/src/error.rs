//! Catalog error taxonomy.
//!
//! Every failure kind is kept distinct so the boundary layer can map it to
//! the right external signal (bad request, not found, conflict, fault).

use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// `offset < 0` or `limit <= 0`. Raised before any store access.
    #[error("invalid pagination parameters (offset={offset}, limit={limit})")]
    InvalidPagination { offset: i64, limit: i64 },

    /// Malformed or negative price threshold.
    #[error("invalid priceLessThan: {0}")]
    InvalidPriceFilter(String),

    /// Lookup by code found nothing. An expected outcome, not a fault.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("invalid category data: {0}")]
    InvalidCategory(String),

    #[error("category code already exists: {0}")]
    CategoryCodeExists(String),

    /// The underlying store failed. Never retried by the catalog layer.
    #[error("internal query failure: {0}")]
    InternalQueryFailure(String),
}

impl CatalogError {
    /// True for errors caused by caller input (never worth retrying).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::InternalQueryFailure(_))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalQueryFailure(msg.into())
    }
}
