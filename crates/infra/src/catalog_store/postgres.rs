//! Postgres-backed catalog store.
//!
//! Expected schema (migrations are managed outside this crate):
//!
//! ```sql
//! CREATE TABLE categories (
//!     id   BIGSERIAL PRIMARY KEY,
//!     code VARCHAR(50)  NOT NULL UNIQUE,
//!     name VARCHAR(255) NOT NULL
//! );
//! CREATE TABLE products (
//!     id          BIGSERIAL PRIMARY KEY,
//!     code        VARCHAR(32)    NOT NULL UNIQUE,
//!     price       NUMERIC(10, 2) NOT NULL,
//!     category_id BIGINT REFERENCES categories (id)
//! );
//! CREATE TABLE product_variants (
//!     id         BIGSERIAL PRIMARY KEY,
//!     product_id BIGINT NOT NULL REFERENCES products (id),
//!     name       VARCHAR(255) NOT NULL,
//!     sku        VARCHAR(64)  NOT NULL UNIQUE,
//!     price      NUMERIC(10, 2)
//! );
//! ```
//!
//! Products are always joined to their category, so the count and the page
//! see the same row set. A NULL variant price is read as `None`.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use shopfront_catalog::{
    Category, CategoryCode, NewCategory, Product, ProductCode, ProductFilters, Variant,
};

use super::r#trait::{CatalogStore, CategoryStore, StoreError};

const PRODUCT_COLUMNS: &str = r#"
    SELECT
        p.id,
        p.code,
        p.price,
        c.id AS category_id,
        c.code AS category_code,
        c.name AS category_name
    FROM products p
    JOIN categories c ON c.id = p.category_id
    WHERE TRUE
"#;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db) = err.as_database_error() {
            let msg = db.message().to_string();
            return if db.is_unique_violation() {
                StoreError::DuplicateKey(msg)
            } else if db.is_foreign_key_violation() {
                StoreError::UnknownReference(msg)
            } else {
                StoreError::Integrity(msg)
            };
        }
        match &err {
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) | sqlx::Error::Decode(_) => {
                StoreError::Integrity(err.to_string())
            }
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

/// Open a connection pool for the catalog database.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Postgres catalog store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is cheap to clone and safe to share.
///
/// ## Consistency
///
/// A product page and its variants are read inside one transaction so a page
/// never mixes products and variants from different snapshots.
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COUNT_PRODUCTS: &str =
    "SELECT COUNT(*) FROM products p JOIN categories c ON c.id = p.category_id WHERE TRUE";

fn count_query(filters: &ProductFilters) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(COUNT_PRODUCTS);
    push_filters(&mut qb, filters);
    qb
}

/// Same predicate as `count_query`, windowed in canonical order.
fn page_query(filters: &ProductFilters) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(PRODUCT_COLUMNS);
    push_filters(&mut qb, filters);
    qb.push(" ORDER BY p.id ASC LIMIT ")
        .push_bind(filters.limit())
        .push(" OFFSET ")
        .push_bind(filters.offset());
    qb
}

fn by_code_query(code: &ProductCode) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(PRODUCT_COLUMNS);
    qb.push(" AND p.code = ").push_bind(code.as_str().to_owned());
    qb
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &ProductFilters) {
    if let Some(code) = filters.category() {
        qb.push(" AND c.code = ").push_bind(code.as_str().to_owned());
    }
    if let Some(threshold) = filters.price_less_than {
        qb.push(" AND p.price < ").push_bind(threshold);
    }
}

fn to_id(raw: i64, what: &str) -> Result<u64, StoreError> {
    u64::try_from(raw).map_err(|_| StoreError::Integrity(format!("negative {what} id {raw}")))
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    Ok(Product {
        id: to_id(row.try_get("id")?, "product")?,
        code: ProductCode::new(row.try_get::<String, _>("code")?),
        price: row.try_get::<Decimal, _>("price")?,
        category: Category {
            id: to_id(row.try_get("category_id")?, "category")?,
            code: CategoryCode::new(row.try_get::<String, _>("category_code")?),
            name: row.try_get("category_name")?,
        },
        variants: Vec::new(),
    })
}

fn category_from_row(row: &PgRow) -> Result<Category, StoreError> {
    Ok(Category {
        id: to_id(row.try_get("id")?, "category")?,
        code: CategoryCode::new(row.try_get::<String, _>("code")?),
        name: row.try_get("name")?,
    })
}

/// Load variants for `products` in one round-trip and attach them in id order.
async fn attach_variants(
    conn: &mut sqlx::PgConnection,
    products: &mut [Product],
) -> Result<(), StoreError> {
    if products.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = products.iter().map(|p| p.id as i64).collect();

    let rows = sqlx::query(
        r#"
        SELECT id, product_id, name, sku, price
        FROM product_variants
        WHERE product_id = ANY($1)
        ORDER BY id ASC
        "#,
    )
    .bind(ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_product: HashMap<u64, Vec<Variant>> = HashMap::new();
    for row in &rows {
        let product_id = to_id(row.try_get("product_id")?, "product")?;
        by_product.entry(product_id).or_default().push(Variant {
            id: to_id(row.try_get("id")?, "variant")?,
            name: row.try_get("name")?,
            sku: row.try_get("sku")?,
            price: row.try_get::<Option<Decimal>, _>("price")?,
        });
    }

    for product in products.iter_mut() {
        product.variants = by_product.remove(&product.id).unwrap_or_default();
    }
    Ok(())
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn count_products(&self, filters: &ProductFilters) -> Result<u64, StoreError> {
        let mut qb = count_query(filters);
        let count = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        u64::try_from(count).map_err(|_| StoreError::Integrity(format!("negative count {count}")))
    }

    async fn fetch_products_page(&self, filters: &ProductFilters) -> Result<Vec<Product>, StoreError> {
        let mut qb = page_query(filters);
        let mut tx = self.pool.begin().await?;
        let rows = qb.build().fetch_all(&mut *tx).await?;
        let mut products = rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        attach_variants(&mut tx, &mut products).await?;
        tx.commit().await?;

        tracing::debug!(rows = products.len(), "fetched product page");
        Ok(products)
    }

    async fn fetch_product_by_code(&self, code: &ProductCode) -> Result<Option<Product>, StoreError> {
        let mut qb = by_code_query(code);
        let mut tx = self.pool.begin().await?;
        let row = qb.build().fetch_optional(&mut *tx).await?;
        let Some(row) = row else {
            tx.commit().await?;
            return Ok(None);
        };

        let mut product = [product_from_row(&row)?];
        attach_variants(&mut tx, &mut product).await?;
        tx.commit().await?;

        let [product] = product;
        Ok(Some(product))
    }
}

#[async_trait]
impl CategoryStore for PostgresCatalogStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query("SELECT id, code, name FROM categories ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(category_from_row).collect()
    }

    async fn insert_category(&self, category: &NewCategory) -> Result<Category, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO categories (code, name)
            VALUES ($1, $2)
            RETURNING id, code, name
            "#,
        )
        .bind(&category.code)
        .bind(&category.name)
        .fetch_one(&self.pool)
        .await?;
        category_from_row(&row)
    }
}
