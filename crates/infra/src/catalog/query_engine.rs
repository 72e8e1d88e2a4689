use shopfront_catalog::{CatalogError, CatalogResult, Product, ProductFilters};
use shopfront_core::Page;

use crate::catalog_store::{CatalogStore, StoreError};

/// Catalog list queries: validated filters in, one ordered page plus the
/// filtered total out.
///
/// ## Flow
///
/// 1. Validate pagination and price ceiling (no store access on failure)
/// 2. Count matching products (independent of the page window)
/// 3. Fetch the page window, unless the offset already lies past the total
///
/// Pure read path: no caching, no retries, no partial results. A store failure
/// at any step fails the whole query with `InternalQueryFailure`.
pub struct QueryEngine<S> {
    store: S,
}

impl<S> QueryEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> QueryEngine<S>
where
    S: CatalogStore,
{
    pub async fn list_products(&self, filters: &ProductFilters) -> CatalogResult<Page<Product>> {
        if let Err(e) = filters.validate() {
            tracing::warn!(offset = filters.offset(), limit = filters.limit(), "rejected product query: {e}");
            return Err(e);
        }

        let total = self
            .store
            .count_products(filters)
            .await
            .map_err(|e| store_failure("count_products", e))?;

        // Validated above, so the offset is non-negative.
        let page = if filters.offset() as u64 >= total {
            Page::empty(total)
        } else {
            let mut items = self
                .store
                .fetch_products_page(filters)
                .await
                .map_err(|e| store_failure("fetch_products_page", e))?;
            items.truncate(usize::try_from(filters.limit()).unwrap_or(usize::MAX));
            Page::new(items, total)
        };

        tracing::debug!(
            offset = filters.offset(),
            limit = filters.limit(),
            category = ?filters.category().map(|c| c.as_str()),
            price_less_than = ?filters.price_less_than,
            total,
            returned = page.len(),
            "listed products"
        );

        Ok(page)
    }
}

pub(crate) fn store_failure(operation: &'static str, err: StoreError) -> CatalogError {
    tracing::error!(operation, "catalog store failure: {err}");
    CatalogError::from(err)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use shopfront_catalog::ProductCode;

    use super::*;
    use crate::catalog_store::InMemoryCatalogStore;
    use crate::fixtures;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    /// PROD001 (12.00, CLOTHING) and PROD002 (8.00, SHOES).
    fn two_product_engine() -> QueryEngine<Arc<InMemoryCatalogStore>> {
        let store = InMemoryCatalogStore::new();
        store.add_category("CLOTHING", "Clothing").unwrap();
        store.add_category("SHOES", "Shoes").unwrap();
        store.add_product("PROD001", dec("12.00"), "CLOTHING").unwrap();
        store.add_product("PROD002", dec("8.00"), "SHOES").unwrap();
        QueryEngine::new(Arc::new(store))
    }

    fn codes(page: &Page<Product>) -> Vec<&str> {
        page.items.iter().map(|p| p.code.as_str()).collect()
    }

    /// Store that counts calls and can be told to fail.
    #[derive(Default)]
    struct ProbeStore {
        calls: AtomicUsize,
        fail_count: bool,
        fail_page: bool,
    }

    #[async_trait]
    impl CatalogStore for ProbeStore {
        async fn count_products(&self, _filters: &ProductFilters) -> Result<u64, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_count {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            Ok(3)
        }

        async fn fetch_products_page(&self, _filters: &ProductFilters) -> Result<Vec<Product>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_page {
                return Err(StoreError::Integrity("broken row".to_string()));
            }
            Ok(Vec::new())
        }

        async fn fetch_product_by_code(&self, _code: &ProductCode) -> Result<Option<Product>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    #[tokio::test]
    async fn category_filter_returns_only_matching_products() {
        let engine = two_product_engine();
        let page = engine
            .list_products(&ProductFilters::new(0, 10).with_category("CLOTHING"))
            .await
            .unwrap();

        assert_eq!(codes(&page), vec!["PROD001"]);
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn price_filter_returns_only_cheaper_products() {
        let engine = two_product_engine();
        let page = engine
            .list_products(&ProductFilters::new(0, 10).with_price_less_than(dec("10.00")))
            .await
            .unwrap();

        assert_eq!(codes(&page), vec!["PROD002"]);
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn offset_past_end_returns_empty_page_with_total() {
        let engine = two_product_engine();
        let page = engine.list_products(&ProductFilters::new(5, 10)).await.unwrap();

        assert!(page.is_empty());
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn unknown_category_yields_zero_total() {
        let engine = two_product_engine();
        let page = engine
            .list_products(&ProductFilters::new(0, 10).with_category("NONEXISTENT"))
            .await
            .unwrap();

        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn combined_filters_apply_both_constraints() {
        let engine = QueryEngine::new(Arc::new(fixtures::demo_catalog().unwrap()));
        let page = engine
            .list_products(
                &ProductFilters::new(0, 100)
                    .with_category("SHOES")
                    .with_price_less_than(dec("10.00")),
            )
            .await
            .unwrap();

        assert!(!page.is_empty());
        for product in &page.items {
            assert_eq!(product.category.code.as_str(), "SHOES");
            assert!(product.price < dec("10.00"));
        }
        assert_eq!(page.total, page.len() as u64);
    }

    #[tokio::test]
    async fn boundary_price_uses_exact_comparison() {
        let store = InMemoryCatalogStore::new();
        store.add_category("SHOES", "Shoes").unwrap();
        store.add_product("EXACT", dec("15.00"), "SHOES").unwrap();
        store.add_product("UNDER", dec("14.999999999"), "SHOES").unwrap();
        let engine = QueryEngine::new(store);

        let page = engine
            .list_products(&ProductFilters::new(0, 10).with_price_less_than(dec("15")))
            .await
            .unwrap();
        assert_eq!(codes(&page), vec!["UNDER"]);
    }

    #[tokio::test]
    async fn pages_walk_the_catalog_in_id_order() {
        let engine = QueryEngine::new(Arc::new(fixtures::demo_catalog().unwrap()));
        let all = engine.list_products(&ProductFilters::new(0, 100)).await.unwrap();

        let mut walked = Vec::new();
        let mut offset = 0;
        loop {
            let page = engine.list_products(&ProductFilters::new(offset, 3)).await.unwrap();
            assert_eq!(page.total, all.total);
            if page.is_empty() {
                break;
            }
            walked.extend(page.items);
            offset += 3;
        }
        assert_eq!(walked, all.items);
        assert!(walked.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn invalid_pagination_fails_before_store_access() {
        let store = Arc::new(ProbeStore::default());
        let engine = QueryEngine::new(store.clone());

        for (offset, limit) in [(-1, 10), (0, 0), (0, -1)] {
            let err = engine
                .list_products(&ProductFilters::new(offset, limit))
                .await
                .unwrap_err();
            assert_eq!(err, CatalogError::InvalidPagination { offset, limit });
        }
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn negative_price_ceiling_fails_before_store_access() {
        let store = Arc::new(ProbeStore::default());
        let engine = QueryEngine::new(store.clone());

        let err = engine
            .list_products(&ProductFilters::new(0, 10).with_price_less_than(dec("-1")))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPriceFilter(_)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn count_failure_is_internal_query_failure() {
        let engine = QueryEngine::new(ProbeStore {
            fail_count: true,
            ..ProbeStore::default()
        });
        let err = engine.list_products(&ProductFilters::new(0, 10)).await.unwrap_err();

        match err {
            CatalogError::InternalQueryFailure(msg) => assert!(msg.contains("connection refused")),
            other => panic!("Expected InternalQueryFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn page_failure_returns_no_partial_data() {
        let engine = QueryEngine::new(ProbeStore {
            fail_page: true,
            ..ProbeStore::default()
        });
        let err = engine.list_products(&ProductFilters::new(0, 10)).await.unwrap_err();
        assert!(matches!(err, CatalogError::InternalQueryFailure(_)));
    }

    #[tokio::test]
    async fn page_fetch_is_skipped_when_offset_is_past_total() {
        let store = Arc::new(ProbeStore::default());
        let engine = QueryEngine::new(store.clone());

        let page = engine.list_products(&ProductFilters::new(3, 10)).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn runtime() -> tokio::runtime::Runtime {
            tokio::runtime::Builder::new_current_thread().build().unwrap()
        }

        fn category() -> impl Strategy<Value = Option<&'static str>> {
            prop_oneof![
                Just(None),
                Just(Some("CLOTHING")),
                Just(Some("SHOES")),
                Just(Some("ACCESSORIES")),
                Just(Some("MISSING")),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 200,
                ..ProptestConfig::default()
            })]

            /// Property: at most `limit` items; total invariant under offset; every
            /// item satisfies every supplied constraint.
            #[test]
            fn page_respects_filters_and_total_is_offset_invariant(
                offset in 0i64..12,
                limit in 1i64..6,
                category in category(),
                ceiling_cents in proptest::option::of(0i64..3000),
            ) {
                let rt = runtime();
                let engine = QueryEngine::new(fixtures::demo_catalog().unwrap());

                let mut filters = ProductFilters::new(offset, limit);
                if let Some(code) = category {
                    filters = filters.with_category(code);
                }
                if let Some(cents) = ceiling_cents {
                    filters = filters.with_price_less_than(Decimal::new(cents, 2));
                }

                let page = rt.block_on(engine.list_products(&filters)).unwrap();
                prop_assert!(page.len() as i64 <= limit);

                let first = ProductFilters { page: shopfront_core::PageRequest::new(0, limit), ..filters.clone() };
                let first_page = rt.block_on(engine.list_products(&first)).unwrap();
                prop_assert_eq!(page.total, first_page.total);

                for product in &page.items {
                    if let Some(code) = category {
                        prop_assert_eq!(product.category.code.as_str(), code);
                    }
                    if let Some(cents) = ceiling_cents {
                        prop_assert!(product.price < Decimal::new(cents, 2));
                    }
                }
            }

            /// Property: identical filters and no writes give identical results.
            #[test]
            fn listing_is_idempotent(offset in 0i64..10, limit in 1i64..10) {
                let rt = runtime();
                let engine = QueryEngine::new(fixtures::demo_catalog().unwrap());
                let filters = ProductFilters::new(offset, limit);

                let a = rt.block_on(engine.list_products(&filters)).unwrap();
                let b = rt.block_on(engine.list_products(&filters)).unwrap();
                prop_assert_eq!(a, b);
            }
        }
    }
}
