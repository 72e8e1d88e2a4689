use serde::{Deserialize, Serialize};

use shopfront_core::{DomainError, DomainResult, Entity};

use crate::error::{CatalogError, CatalogResult};

impl_code_newtype!(CategoryCode, "category");

pub const MAX_CATEGORY_CODE_LEN: usize = 50;
pub const MAX_CATEGORY_NAME_LEN: usize = 255;

/// A product category. `code` is unique across all categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Internal storage identifier; defines canonical ordering.
    pub id: u64,
    pub code: CategoryCode,
    pub name: String,
}

impl Entity for Category {
    type Id = CategoryCode;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}

/// Input for category creation (not yet persisted, not yet validated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub code: String,
    pub name: String,
}

impl NewCategory {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Check the creation rules: both fields present, not whitespace-only,
    /// and within the length limits (counted in characters).
    pub fn validate(&self) -> CatalogResult<()> {
        self.check()
            .map_err(|DomainError::Validation(msg)| CatalogError::InvalidCategory(msg))
    }

    fn check(&self) -> DomainResult<()> {
        if self.code.is_empty() || self.name.is_empty() {
            return Err(DomainError::validation("code and name are required"));
        }
        if self.code.trim().is_empty() || self.name.trim().is_empty() {
            return Err(DomainError::validation(
                "code and name cannot be empty or whitespace only",
            ));
        }
        if self.code.chars().count() > MAX_CATEGORY_CODE_LEN {
            return Err(DomainError::validation(format!(
                "code too long: maximum {MAX_CATEGORY_CODE_LEN} characters"
            )));
        }
        if self.name.chars().count() > MAX_CATEGORY_NAME_LEN {
            return Err(DomainError::validation(format!(
                "name too long: maximum {MAX_CATEGORY_NAME_LEN} characters"
            )));
        }
        Ok(())
    }

    pub fn code(&self) -> CategoryCode {
        CategoryCode::new(self.code.clone())
    }
}
