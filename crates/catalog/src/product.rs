use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopfront_core::Entity;

use crate::category::Category;

impl_code_newtype!(ProductCode, "product");

/// A purchasable variant of a product (size, colour, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Internal storage identifier; defines canonical ordering.
    pub id: u64,
    pub name: String,
    pub sku: String,
    /// Stored price. `None` and zero both mean "inherit from the product".
    pub price: Option<Decimal>,
}

impl Variant {
    /// The variant's own price, if it carries one.
    pub fn explicit_price(&self) -> Option<Decimal> {
        self.price.filter(|p| !p.is_zero())
    }

    /// Price used for display: the explicit price, or else `parent_price`.
    pub fn effective_price(&self, parent_price: Decimal) -> Decimal {
        self.explicit_price().unwrap_or(parent_price)
    }
}

/// Catalog product with its category and variants populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Internal storage identifier; list results are ordered by it.
    pub id: u64,
    pub code: ProductCode,
    pub price: Decimal,
    pub category: Category,
    pub variants: Vec<Variant>,
}

impl Entity for Product {
    type Id = ProductCode;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}

impl Product {
    /// Resolve variant prices against this product's price.
    ///
    /// Pure: the stored variants are left untouched.
    pub fn resolve(&self) -> ProductDetail {
        let variants = self
            .variants
            .iter()
            .map(|v| ResolvedVariant {
                name: v.name.clone(),
                sku: v.sku.clone(),
                price: v.effective_price(self.price),
                inherited: v.explicit_price().is_none(),
            })
            .collect();

        ProductDetail {
            code: self.code.clone(),
            price: self.price,
            category: self.category.clone(),
            variants,
        }
    }
}

/// Variant annotated with its effective price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVariant {
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    /// True when `price` was taken from the parent product.
    pub inherited: bool,
}

/// Full product detail as returned by the detail lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub code: ProductCode,
    pub price: Decimal,
    pub category: Category,
    pub variants: Vec<ResolvedVariant>,
}
