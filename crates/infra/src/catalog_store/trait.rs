use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use shopfront_catalog::{CatalogError, Category, NewCategory, Product, ProductCode, ProductFilters};

/// Catalog store operation error.
///
/// These are **infrastructure errors** (availability, integrity) as opposed to
/// the catalog's caller-facing errors (pagination, not-found).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("unknown reference: {0}")]
    UnknownReference(String),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        CatalogError::InternalQueryFailure(err.to_string())
    }
}

/// Read capabilities the catalog needs from persistence.
///
/// ## Contract
///
/// - `count_products` and `fetch_products_page` apply the same category and
///   price predicate, so the count describes exactly the set being paged.
/// - Pages are ordered by ascending internal product id; variants inside a
///   product by ascending variant id.
/// - Every returned `Product` has its category and variants populated.
/// - Implementations never validate pagination; callers do that first.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Number of products matching the category/price filters (pagination ignored).
    async fn count_products(&self, filters: &ProductFilters) -> Result<u64, StoreError>;

    /// The `offset`/`limit` window over the filtered, ordered product set.
    async fn fetch_products_page(&self, filters: &ProductFilters) -> Result<Vec<Product>, StoreError>;

    /// Single product by exact code, or `None`.
    async fn fetch_product_by_code(&self, code: &ProductCode) -> Result<Option<Product>, StoreError>;
}

/// Category listing and creation.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories, ordered by ascending internal id.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Persist a new category. Fails with `DuplicateKey` when the code exists.
    async fn insert_category(&self, category: &NewCategory) -> Result<Category, StoreError>;
}

#[async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn count_products(&self, filters: &ProductFilters) -> Result<u64, StoreError> {
        (**self).count_products(filters).await
    }

    async fn fetch_products_page(&self, filters: &ProductFilters) -> Result<Vec<Product>, StoreError> {
        (**self).fetch_products_page(filters).await
    }

    async fn fetch_product_by_code(&self, code: &ProductCode) -> Result<Option<Product>, StoreError> {
        (**self).fetch_product_by_code(code).await
    }
}

#[async_trait]
impl<S> CategoryStore for Arc<S>
where
    S: CategoryStore + ?Sized,
{
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        (**self).list_categories().await
    }

    async fn insert_category(&self, category: &NewCategory) -> Result<Category, StoreError> {
        (**self).insert_category(category).await
    }
}
