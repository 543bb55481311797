use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Icon given to budgets saved without one.
pub const DEFAULT_BUDGET_ICON: &str = "ri-folder-line";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Budget {
    pub fn new(id: String, category: String, amount: Decimal) -> Self {
        Self {
            id,
            category,
            amount,
            icon: Some(DEFAULT_BUDGET_ICON.to_string()),
        }
    }

    pub fn icon_or_default(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_BUDGET_ICON)
    }

    pub(crate) fn check(&self) -> Result<(), ValidationError> {
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        Ok(())
    }
}
