use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::models::{Budget, Transaction, TransactionType};

/// User input for creating or editing a transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDraft {
    pub amount: Option<Decimal>,
    pub kind: Option<TransactionType>,
    pub category: String,
    pub date: Option<NaiveDate>,
    pub notes: String,
    pub recurring: bool,
    pub icon: String,
}

impl TransactionDraft {
    pub fn from_transaction(txn: &Transaction) -> Self {
        Self {
            amount: Some(txn.amount),
            kind: Some(txn.kind),
            category: txn.category.clone(),
            date: Some(txn.date),
            notes: txn.notes.clone().unwrap_or_default(),
            recurring: txn.recurring,
            icon: txn.icon.clone().unwrap_or_default(),
        }
    }

    pub(crate) fn into_transaction(self, id: String) -> Result<Transaction, ValidationError> {
        let amount = self.amount.ok_or(ValidationError::MissingAmount)?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        let kind = self.kind.ok_or(ValidationError::MissingType)?;
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        let date = self.date.ok_or(ValidationError::MissingDate)?;

        Ok(Transaction {
            id,
            amount,
            kind,
            category: self.category,
            date,
            notes: Some(self.notes).filter(|n| !n.is_empty()),
            recurring: self.recurring,
            icon: Some(self.icon).filter(|i| !i.is_empty()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetDraft {
    pub category: String,
    pub amount: Option<Decimal>,
    pub icon: String,
}

impl BudgetDraft {
    pub(crate) fn into_budget(self, id: String) -> Result<Budget, ValidationError> {
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        let amount = self.amount.ok_or(ValidationError::MissingAmount)?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        let mut budget = Budget::new(id, self.category, amount);
        if !self.icon.is_empty() {
            budget.icon = Some(self.icon);
        }
        Ok(budget)
    }
}
