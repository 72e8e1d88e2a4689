use shopfront_catalog::{CatalogError, CatalogResult, ProductCode, ProductDetail};

use super::query_engine::store_failure;
use crate::catalog_store::CatalogStore;

/// Single-product lookup with variant price inheritance applied.
pub struct DetailResolver<S> {
    store: S,
}

impl<S> DetailResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> DetailResolver<S>
where
    S: CatalogStore,
{
    /// Fetch `code` (exact match) and resolve effective variant prices.
    ///
    /// An empty code cannot match any product and fails with
    /// `ProductNotFound` without querying the store.
    pub async fn get_product_detail(&self, code: &str) -> CatalogResult<ProductDetail> {
        if code.is_empty() {
            return Err(CatalogError::ProductNotFound(String::new()));
        }

        let product = self
            .store
            .fetch_product_by_code(&ProductCode::new(code))
            .await
            .map_err(|e| store_failure("fetch_product_by_code", e))?
            .ok_or_else(|| CatalogError::ProductNotFound(code.to_string()))?;

        let detail = product.resolve();
        tracing::debug!(
            code,
            variants = detail.variants.len(),
            inherited = detail.variants.iter().filter(|v| v.inherited).count(),
            "resolved product detail"
        );
        Ok(detail)
    }
}
