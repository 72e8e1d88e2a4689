use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopfront_catalog::{
    parse_price_threshold, CatalogResult, Category, NewCategory, Product, ProductDetail, ProductFilters,
    ResolvedVariant,
};
use shopfront_core::Page;

pub const DEFAULT_OFFSET: i64 = 0;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 100;

// -------------------------
// Request DTOs
// -------------------------

/// Raw `GET /catalog` query string. Kept as strings so unparseable numbers
/// fall back to defaults instead of rejecting the request.
#[derive(Debug, Default)]
pub struct ListProductsQuery {
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub price_less_than: Option<String>,
}

impl ListProductsQuery {
    /// Collect the known parameters from decoded key/value pairs. The first
    /// occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "offset" => &mut query.offset,
                "limit" => &mut query.limit,
                "category" => &mut query.category,
                "priceLessThan" => &mut query.price_less_than,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    /// Apply boundary defaults and clamping, then build the filter set.
    ///
    /// A negative offset is passed through unchanged so the query engine can
    /// reject it.
    pub fn into_filters(self) -> CatalogResult<ProductFilters> {
        let offset = parse_int_or(self.offset.as_deref(), DEFAULT_OFFSET);
        let limit = parse_int_or(self.limit.as_deref(), DEFAULT_LIMIT).clamp(MIN_LIMIT, MAX_LIMIT);

        let mut filters = ProductFilters::new(offset, limit);
        if let Some(code) = self.category.filter(|c| !c.is_empty()) {
            filters = filters.with_category(code);
        }
        if let Some(raw) = self.price_less_than.filter(|p| !p.trim().is_empty()) {
            filters = filters.with_price_less_than(parse_price_threshold(raw.trim())?);
        }
        Ok(filters)
    }
}

fn parse_int_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
}

impl From<CreateCategoryRequest> for NewCategory {
    fn from(req: CreateCategoryRequest) -> Self {
        NewCategory::new(req.code, req.name)
    }
}

// -------------------------
// Response DTOs
// -------------------------

/// Decimal to JSON number. Lossy, and only ever applied at the response edge.
fn price(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

#[derive(Debug, Serialize)]
pub struct CategoryRef {
    pub code: String,
    pub name: String,
}

impl From<Category> for CategoryRef {
    fn from(c: Category) -> Self {
        Self {
            code: c.code.into_inner(),
            name: c.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: u64,
    pub code: String,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            code: c.code.into_inner(),
            name: c.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub code: String,
    pub price: f64,
    pub category: CategoryRef,
}

impl From<Product> for ProductSummary {
    fn from(p: Product) -> Self {
        Self {
            code: p.code.into_inner(),
            price: price(p.price),
            category: p.category.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductSummary>,
    pub total: u64,
}

impl From<Page<Product>> for ProductListResponse {
    fn from(page: Page<Product>) -> Self {
        let page = page.map(ProductSummary::from);
        Self {
            products: page.items,
            total: page.total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VariantResponse {
    pub name: String,
    pub sku: String,
    pub price: f64,
}

impl From<ResolvedVariant> for VariantResponse {
    fn from(v: ResolvedVariant) -> Self {
        Self {
            name: v.name,
            sku: v.sku,
            price: price(v.price),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    pub code: String,
    pub price: f64,
    pub category: CategoryRef,
    pub variants: Vec<VariantResponse>,
}

impl From<ProductDetail> for ProductDetailResponse {
    fn from(d: ProductDetail) -> Self {
        Self {
            code: d.code.into_inner(),
            price: price(d.price),
            category: d.category.into(),
            variants: d.variants.into_iter().map(VariantResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_catalog::CatalogError;

    fn query(offset: Option<&str>, limit: Option<&str>) -> ListProductsQuery {
        ListProductsQuery {
            offset: offset.map(str::to_string),
            limit: limit.map(str::to_string),
            ..ListProductsQuery::default()
        }
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let query = ListProductsQuery::from_pairs(pairs(&[
            ("limit", "1"),
            ("category", "SHOES"),
            ("limit", "2"),
            ("category", "CLOTHING"),
            ("unknown", "x"),
        ]));
        assert_eq!(query.limit.as_deref(), Some("1"));
        assert_eq!(query.category.as_deref(), Some("SHOES"));
        assert!(query.offset.is_none());
    }

    #[test]
    fn price_key_is_case_sensitive() {
        let query = ListProductsQuery::from_pairs(pairs(&[("pricelessthan", "5"), ("priceLessThan", "9.5")]));
        assert_eq!(query.price_less_than.as_deref(), Some("9.5"));
    }

    #[test]
    fn missing_or_malformed_paging_uses_defaults() {
        let filters = query(None, None).into_filters().unwrap();
        assert_eq!((filters.offset(), filters.limit()), (0, 10));

        let filters = query(Some("abc"), Some("1.5")).into_filters().unwrap();
        assert_eq!((filters.offset(), filters.limit()), (0, 10));
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(query(None, Some("0")).into_filters().unwrap().limit(), 1);
        assert_eq!(query(None, Some("-5")).into_filters().unwrap().limit(), 1);
        assert_eq!(query(None, Some("1000")).into_filters().unwrap().limit(), 100);
    }

    #[test]
    fn negative_offset_is_passed_through() {
        assert_eq!(query(Some("-1"), None).into_filters().unwrap().offset(), -1);
    }

    #[test]
    fn price_filter_is_parsed_exactly() {
        let filters = ListProductsQuery {
            price_less_than: Some("14.99".to_string()),
            ..ListProductsQuery::default()
        }
        .into_filters()
        .unwrap();
        assert_eq!(filters.price_less_than, Some(Decimal::new(1499, 2)));
    }

    #[test]
    fn malformed_price_filter_is_rejected() {
        for raw in ["abc", "-1"] {
            let err = ListProductsQuery {
                price_less_than: Some(raw.to_string()),
                ..ListProductsQuery::default()
            }
            .into_filters()
            .unwrap_err();
            assert!(matches!(err, CatalogError::InvalidPriceFilter(_)), "{raw}");
        }
    }

    #[test]
    fn empty_category_means_no_filter() {
        let filters = ListProductsQuery {
            category: Some(String::new()),
            ..ListProductsQuery::default()
        }
        .into_filters()
        .unwrap();
        assert!(filters.category().is_none());
    }
}
