//! Request-scoped product filter set.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopfront_core::PageRequest;

use crate::category::CategoryCode;
use crate::error::{CatalogError, CatalogResult};
use crate::product::Product;

/// Pagination plus the optional category and price-ceiling constraints.
///
/// Both constraints compose conjunctively. Constructed per request, validated
/// before use, discarded after the query completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilters {
    pub page: PageRequest,
    /// Exact, case-sensitive category code match. Empty means no filter.
    pub category_code: Option<CategoryCode>,
    /// Strict upper bound on product price.
    pub price_less_than: Option<Decimal>,
}

impl ProductFilters {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            page: PageRequest::new(offset, limit),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, code: impl Into<CategoryCode>) -> Self {
        let code = code.into();
        self.category_code = (!code.is_empty()).then_some(code);
        self
    }

    pub fn with_price_less_than(mut self, threshold: Decimal) -> Self {
        self.price_less_than = Some(threshold);
        self
    }

    pub fn offset(&self) -> i64 {
        self.page.offset
    }

    pub fn limit(&self) -> i64 {
        self.page.limit
    }

    /// Category constraint, ignoring an empty code.
    pub fn category(&self) -> Option<&CategoryCode> {
        self.category_code.as_ref().filter(|c| !c.is_empty())
    }

    /// Reject invalid pagination first, then a negative price ceiling.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.page.validate().is_err() {
            return Err(CatalogError::InvalidPagination {
                offset: self.page.offset,
                limit: self.page.limit,
            });
        }
        if let Some(threshold) = self.price_less_than {
            if threshold < Decimal::ZERO {
                return Err(CatalogError::InvalidPriceFilter(format!(
                    "must be a non-negative number, got {threshold}"
                )));
            }
        }
        Ok(())
    }

    /// Whether `product` satisfies the category and price constraints.
    ///
    /// Pagination is not considered here.
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category()
            .is_none_or(|code| product.category.code == *code);
        let price_ok = self
            .price_less_than
            .is_none_or(|threshold| product.price < threshold);
        category_ok && price_ok
    }
}

/// Parse a caller-supplied price ceiling as an exact decimal.
///
/// Accepts plain (`"15.00"`) and scientific (`"1.5e1"`) notation. Malformed
/// and negative input is rejected. Excess fractional digits are rounded.
/// Well-formed values the decimal type cannot hold saturate: large ones to
/// `Decimal::MAX`, tiny positive ones to the smallest positive decimal.
pub fn parse_price_threshold(raw: &str) -> CatalogResult<Decimal> {
    let value = match Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) {
        Ok(value) => value,
        Err(_) => saturate_out_of_range(raw)?,
    };

    if value < Decimal::ZERO {
        return Err(negative_threshold(raw));
    }
    Ok(value)
}

fn negative_threshold(raw: &str) -> CatalogError {
    CatalogError::InvalidPriceFilter(format!("must be a non-negative number, got {raw:?}"))
}

/// Fallback for input `Decimal` refused: classify it by magnitude if it is
/// numeric at all.
fn saturate_out_of_range(raw: &str) -> CatalogResult<Decimal> {
    let malformed = || CatalogError::InvalidPriceFilter(format!("must be a valid number, got {raw:?}"));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (mantissa, exponent) = match body.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (body, None),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
        return Err(malformed());
    }

    let exponent: i64 = match exponent {
        None => 0,
        Some(e) => {
            let digits = e.strip_prefix(['+', '-']).unwrap_or(e);
            if digits.is_empty() || !all_digits(digits) {
                return Err(malformed());
            }
            e.parse()
                .unwrap_or(if e.starts_with('-') { i64::MIN } else { i64::MAX })
        }
    };

    let significant = int_part.bytes().chain(frac_part.bytes()).position(|b| b != b'0');
    let Some(first) = significant else {
        return Ok(Decimal::ZERO);
    };
    if negative {
        return Err(negative_threshold(raw));
    }

    // Power of ten of the leading significant digit.
    let leading = (int_part.len() as i64 - first as i64 - 1).saturating_add(exponent);
    if leading >= 0 {
        Ok(Decimal::MAX)
    } else {
        Ok(Decimal::new(1, Decimal::MAX_SCALE))
    }
}
