use shopfront_catalog::{CatalogError, CatalogResult, Category, NewCategory};

use super::query_engine::store_failure;
use crate::catalog_store::{CategoryStore, StoreError};

/// Category listing and creation.
pub struct CategoryService<S> {
    store: S,
}

impl<S> CategoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> CategoryService<S>
where
    S: CategoryStore,
{
    pub async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let categories = self
            .store
            .list_categories()
            .await
            .map_err(|e| store_failure("list_categories", e))?;
        tracing::info!(count = categories.len(), "fetched categories");
        Ok(categories)
    }

    /// Validate, then persist. A duplicate code maps to `CategoryCodeExists`.
    pub async fn create_category(&self, new: NewCategory) -> CatalogResult<Category> {
        if let Err(e) = new.validate() {
            tracing::warn!(code = %new.code, "invalid category: {e}");
            return Err(e);
        }

        match self.store.insert_category(&new).await {
            Ok(category) => {
                tracing::info!(code = %category.code, id = category.id, "created category");
                Ok(category)
            }
            Err(StoreError::DuplicateKey(_)) => {
                tracing::warn!(code = %new.code, "duplicate category code");
                Err(CatalogError::CategoryCodeExists(new.code))
            }
            Err(e) => Err(store_failure("insert_category", e)),
        }
    }
}
