use std::sync::Arc;

use anyhow::Context;

use shopfront_catalog::{CatalogResult, Category, NewCategory, Product, ProductDetail, ProductFilters};
use shopfront_core::Page;
use shopfront_infra::{
    catalog::{CategoryService, DetailResolver, QueryEngine},
    catalog_store::{postgres::connect, CatalogStore, CategoryStore, InMemoryCatalogStore, PostgresCatalogStore},
    config::AppConfig,
    fixtures,
};

/// The catalog services, all sharing one store handle.
pub struct CatalogServices<S> {
    pub engine: QueryEngine<S>,
    pub resolver: DetailResolver<S>,
    pub categories: CategoryService<S>,
}

impl<S> CatalogServices<S>
where
    S: CatalogStore + CategoryStore + Clone,
{
    pub fn new(store: S) -> Self {
        Self {
            engine: QueryEngine::new(store.clone()),
            resolver: DetailResolver::new(store.clone()),
            categories: CategoryService::new(store),
        }
    }
}

pub enum AppServices {
    InMemory(CatalogServices<Arc<InMemoryCatalogStore>>),
    Persistent(CatalogServices<PostgresCatalogStore>),
}

impl AppServices {
    pub fn in_memory(store: Arc<InMemoryCatalogStore>) -> Self {
        AppServices::InMemory(CatalogServices::new(store))
    }

    pub fn persistent(store: PostgresCatalogStore) -> Self {
        AppServices::Persistent(CatalogServices::new(store))
    }

    pub async fn list_products(&self, filters: &ProductFilters) -> CatalogResult<Page<Product>> {
        match self {
            AppServices::InMemory(s) => s.engine.list_products(filters).await,
            AppServices::Persistent(s) => s.engine.list_products(filters).await,
        }
    }

    pub async fn product_detail(&self, code: &str) -> CatalogResult<ProductDetail> {
        match self {
            AppServices::InMemory(s) => s.resolver.get_product_detail(code).await,
            AppServices::Persistent(s) => s.resolver.get_product_detail(code).await,
        }
    }

    pub async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        match self {
            AppServices::InMemory(s) => s.categories.list_categories().await,
            AppServices::Persistent(s) => s.categories.list_categories().await,
        }
    }

    pub async fn create_category(&self, new: NewCategory) -> CatalogResult<Category> {
        match self {
            AppServices::InMemory(s) => s.categories.create_category(new).await,
            AppServices::Persistent(s) => s.categories.create_category(new).await,
        }
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    if config.use_persistent_stores {
        match config.database_url.as_deref() {
            Some(url) => return build_persistent_services(url, config.database_max_connections).await,
            None => tracing::warn!(
                "USE_PERSISTENT_STORES=true but DATABASE_URL not set, falling back to in-memory"
            ),
        }
    }

    build_in_memory_services()
}

fn build_in_memory_services() -> anyhow::Result<AppServices> {
    let store = fixtures::demo_catalog().context("failed to seed demo catalog")?;
    let products = store.product_count().context("failed to read demo catalog")?;
    tracing::info!(products, "using in-memory catalog store");
    Ok(AppServices::in_memory(Arc::new(store)))
}

async fn build_persistent_services(url: &str, max_connections: u32) -> anyhow::Result<AppServices> {
    let pool = connect(url, max_connections)
        .await
        .context("failed to connect to catalog database")?;
    tracing::info!(max_connections, "using postgres catalog store");
    Ok(AppServices::persistent(PostgresCatalogStore::new(pool)))
}
