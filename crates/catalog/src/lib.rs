//! Catalog domain module.
//!
//! This crate contains the catalog records (products, categories, variants),
//! the request-scoped filter set, and the read-time business rules (filter
//! validation and variant price inheritance). It is deterministic domain
//! logic only: no IO, no HTTP, no storage.

/// Business-key newtype over `String` (case-sensitive, compared exactly).
macro_rules! impl_code_newtype {
    ($t:ident, $what:literal) => {
        #[doc = concat!("Unique business key of a ", $what, ".")]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $t(String);

        impl $t {
            pub fn new(code: impl Into<String>) -> Self {
                Self(code.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

pub mod category;
pub mod error;
pub mod filters;
pub mod product;

pub use category::{Category, CategoryCode, NewCategory, MAX_CATEGORY_CODE_LEN, MAX_CATEGORY_NAME_LEN};
pub use error::{CatalogError, CatalogResult};
pub use filters::{parse_price_threshold, ProductFilters};
pub use product::{Product, ProductCode, ProductDetail, ResolvedVariant, Variant};

pub use rust_decimal::Decimal;
