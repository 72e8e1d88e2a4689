use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use rust_decimal::Decimal;

use shopfront_catalog::{
    Category, CategoryCode, NewCategory, Product, ProductCode, ProductFilters, Variant,
};
use shopfront_core::Entity;

use super::r#trait::{CatalogStore, CategoryStore, StoreError};

#[derive(Debug, Default)]
struct CatalogData {
    categories: BTreeMap<u64, Category>,
    products: BTreeMap<u64, Product>,
    next_category_id: u64,
    next_product_id: u64,
    next_variant_id: u64,
}

impl CatalogData {
    fn category_by_code(&self, code: &CategoryCode) -> Option<&Category> {
        self.categories.values().find(|c| c.id() == code)
    }

    fn product_by_code_mut(&mut self, code: &ProductCode) -> Option<&mut Product> {
        self.products.values_mut().find(|p| p.id() == code)
    }

    fn sku_taken(&self, sku: &str) -> bool {
        self.products
            .values()
            .flat_map(|p| p.variants.iter())
            .any(|v| v.sku == sku)
    }

    fn matching<'a>(&'a self, filters: &'a ProductFilters) -> impl Iterator<Item = &'a Product> + 'a {
        // BTreeMap iteration is ascending by id: the canonical order.
        self.products.values().filter(move |p| filters.matches(p))
    }
}

/// In-memory catalog store.
///
/// Intended for tests/dev. Ids are assigned sequentially per record kind,
/// mirroring database serial columns, and define the listing order.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<CatalogData>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CatalogData>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CatalogData>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    /// Insert a category without running the creation validation rules.
    pub fn add_category(&self, code: &str, name: &str) -> Result<Category, StoreError> {
        let mut data = self.write()?;
        let code = CategoryCode::new(code);
        if data.category_by_code(&code).is_some() {
            return Err(StoreError::DuplicateKey(format!("category code {code}")));
        }

        data.next_category_id += 1;
        let category = Category {
            id: data.next_category_id,
            code,
            name: name.to_string(),
        };
        data.categories.insert(category.id, category.clone());
        Ok(category)
    }

    /// Insert a product under an existing category. Returns the assigned id.
    pub fn add_product(&self, code: &str, price: Decimal, category_code: &str) -> Result<u64, StoreError> {
        let mut data = self.write()?;
        let code = ProductCode::new(code);
        if data.products.values().any(|p| p.id() == &code) {
            return Err(StoreError::DuplicateKey(format!("product code {code}")));
        }
        let category = data
            .category_by_code(&CategoryCode::new(category_code))
            .cloned()
            .ok_or_else(|| StoreError::UnknownReference(format!("category {category_code}")))?;

        data.next_product_id += 1;
        let id = data.next_product_id;
        data.products.insert(
            id,
            Product {
                id,
                code,
                price,
                category,
                variants: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Attach a variant to an existing product. SKUs are unique store-wide.
    pub fn add_variant(
        &self,
        product_code: &str,
        name: &str,
        sku: &str,
        price: Option<Decimal>,
    ) -> Result<u64, StoreError> {
        let mut data = self.write()?;
        if data.sku_taken(sku) {
            return Err(StoreError::DuplicateKey(format!("sku {sku}")));
        }

        let id = data.next_variant_id + 1;
        let product = data
            .product_by_code_mut(&ProductCode::new(product_code))
            .ok_or_else(|| StoreError::UnknownReference(format!("product {product_code}")))?;
        product.variants.push(Variant {
            id,
            name: name.to_string(),
            sku: sku.to_string(),
            price,
        });
        data.next_variant_id = id;
        Ok(id)
    }

    pub fn product_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.products.len())
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn count_products(&self, filters: &ProductFilters) -> Result<u64, StoreError> {
        let data = self.read()?;
        Ok(data.matching(filters).count() as u64)
    }

    async fn fetch_products_page(&self, filters: &ProductFilters) -> Result<Vec<Product>, StoreError> {
        let data = self.read()?;
        let matching: Vec<&Product> = data.matching(filters).collect();
        let window = filters.page.window(matching.len());
        Ok(matching[window].iter().map(|p| (*p).clone()).collect())
    }

    async fn fetch_product_by_code(&self, code: &ProductCode) -> Result<Option<Product>, StoreError> {
        let data = self.read()?;
        Ok(data.products.values().find(|p| p.id() == code).cloned())
    }
}

#[async_trait]
impl CategoryStore for InMemoryCatalogStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let data = self.read()?;
        Ok(data.categories.values().cloned().collect())
    }

    async fn insert_category(&self, category: &NewCategory) -> Result<Category, StoreError> {
        self.add_category(&category.code, &category.name)
    }
}
