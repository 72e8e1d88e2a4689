//! Deterministic demo catalog for local runs and tests.

use rust_decimal::Decimal;

use crate::catalog_store::{InMemoryCatalogStore, StoreError};

type VariantRow = (&'static str, &'static str, Option<i64>);

const CATEGORIES: &[(&str, &str)] = &[
    ("CLOTHING", "Clothing"),
    ("SHOES", "Shoes"),
    ("ACCESSORIES", "Accessories"),
];

/// `(code, price in cents, category, variants)`; variant prices in cents, `None` inherits.
const PRODUCTS: &[(&str, i64, &str, &[VariantRow])] = &[
    (
        "PROD001",
        1099,
        "CLOTHING",
        &[
            ("Variant A", "SKU001A", Some(1199)),
            ("Variant B", "SKU001B", None),
            ("Variant C", "SKU001C", Some(1249)),
        ],
    ),
    (
        "PROD002",
        1249,
        "SHOES",
        &[("Variant A", "SKU002A", None), ("Variant B", "SKU002B", Some(1399))],
    ),
    ("PROD003", 875, "ACCESSORIES", &[("Variant A", "SKU003A", None)]),
    (
        "PROD004",
        1500,
        "CLOTHING",
        &[("Variant A", "SKU004A", Some(0)), ("Variant B", "SKU004B", Some(1650))],
    ),
    ("PROD005", 999, "SHOES", &[("Variant A", "SKU005A", None)]),
    (
        "PROD006",
        2200,
        "CLOTHING",
        &[("Variant A", "SKU006A", None), ("Variant B", "SKU006B", Some(2400))],
    ),
    ("PROD007", 549, "ACCESSORIES", &[("Variant A", "SKU007A", None)]),
    ("PROD008", 1995, "SHOES", &[("Variant A", "SKU008A", Some(1895))]),
];

/// Load the demo categories, products and variants into `store`.
pub fn seed_demo_catalog(store: &InMemoryCatalogStore) -> Result<(), StoreError> {
    for (code, name) in CATEGORIES {
        store.add_category(code, name)?;
    }
    for (code, cents, category, variants) in PRODUCTS {
        store.add_product(code, Decimal::new(*cents, 2), category)?;
        for (name, sku, price) in variants.iter() {
            store.add_variant(code, name, sku, price.map(|c| Decimal::new(c, 2)))?;
        }
    }
    tracing::debug!(products = PRODUCTS.len(), "seeded demo catalog");
    Ok(())
}

/// A fresh in-memory store holding the demo catalog.
pub fn demo_catalog() -> Result<InMemoryCatalogStore, StoreError> {
    let store = InMemoryCatalogStore::new();
    seed_demo_catalog(&store)?;
    Ok(store)
}
