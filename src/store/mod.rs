mod draft;
mod gateway;

use std::collections::{BTreeSet, HashSet};

use crate::error::Error;
use crate::models::{Budget, Settings, Transaction, TransactionType, YearMonth};

pub use draft::{BudgetDraft, TransactionDraft};
pub use gateway::{SerializedState, StateGateway, STATE_VERSION};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub search: String,
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
}

impl TransactionFilter {
    fn matches(&self, txn: &Transaction) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || txn.category.to_lowercase().contains(&needle)
            || txn
                .notes
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&needle));
        let matches_kind = self.kind.is_none_or(|k| k == txn.kind);
        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|c| c == txn.category);

        matches_search && matches_kind && matches_category
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    settings: Settings,
}

impl EntityStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            transactions: Vec::new(),
            budgets: Vec::new(),
            settings,
        }
    }

    pub fn from_state(state: SerializedState, active_month: YearMonth) -> Self {
        let mut settings = Settings::new(active_month);
        settings.theme = state.theme;
        settings.dark_mode = state.dark_mode;
        settings.chart_type = state.chart_type;
        settings.trend_chart_type = state.trend_chart_type;

        Self {
            transactions: state.transactions,
            budgets: state.budgets,
            settings,
        }
    }

    pub fn to_state(&self) -> SerializedState {
        SerializedState {
            version: STATE_VERSION,
            transactions: self.transactions.clone(),
            budgets: self.budgets.clone(),
            dark_mode: self.settings.dark_mode,
            chart_type: self.settings.chart_type,
            trend_chart_type: self.settings.trend_chart_type,
            theme: self.settings.theme.clone(),
        }
    }

    // ── Reads ─────────────────────────────────────────────────

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn budget(&self, id: &str) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.id == id)
    }

    pub fn budget_for_category(&self, category: &str) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.category == category)
    }

    pub fn categories(&self) -> BTreeSet<&str> {
        self.transactions
            .iter()
            .map(|t| t.category.as_str())
            .chain(self.budgets.iter().map(|b| b.category.as_str()))
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// Transactions matching `filter`, recurring ones first, then newest first.
    pub fn filter_transactions(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        let mut matched: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|t| filter.matches(t))
            .collect();
        matched.sort_by(|a, b| b.recurring.cmp(&a.recurring).then(b.date.cmp(&a.date)));
        matched
    }

    /// Display icon: the transaction's own, else its budget's, else by type.
    pub fn icon_for<'s>(&'s self, txn: &'s Transaction) -> &'s str {
        txn.icon
            .as_deref()
            .or_else(|| {
                self.budget_for_category(&txn.category)
                    .and_then(|b| b.icon.as_deref())
            })
            .unwrap_or_else(|| txn.kind.default_icon())
    }

    // ── Transactions ──────────────────────────────────────────

    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<&Transaction, Error> {
        let txn = draft.into_transaction(new_id())?;
        tracing::info!(id = %txn.id, category = %txn.category, "added transaction");
        self.transactions.push(txn);
        Ok(&self.transactions[self.transactions.len() - 1])
    }

    pub fn update_transaction(&mut self, id: &str, draft: TransactionDraft) -> Result<&Transaction, Error> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::TransactionNotFound(id.to_string()))?;
        let txn = draft.into_transaction(id.to_string())?;
        tracing::info!(id, "updated transaction");
        self.transactions[index] = txn;
        Ok(&self.transactions[index])
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<Transaction, Error> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::TransactionNotFound(id.to_string()))?;
        tracing::info!(id, "deleted transaction");
        Ok(self.transactions.remove(index))
    }

    // ── Budgets ───────────────────────────────────────────────

    pub fn add_budget(&mut self, draft: BudgetDraft) -> Result<&Budget, Error> {
        let budget = draft.into_budget(new_id())?;
        self.ensure_category_free(&budget.category, None)?;
        tracing::info!(id = %budget.id, category = %budget.category, "added budget");
        self.budgets.push(budget);
        Ok(&self.budgets[self.budgets.len() - 1])
    }

    pub fn update_budget(&mut self, id: &str, draft: BudgetDraft) -> Result<&Budget, Error> {
        let index = self
            .budgets
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| Error::BudgetNotFound(id.to_string()))?;
        let budget = draft.into_budget(id.to_string())?;
        self.ensure_category_free(&budget.category, Some(id))?;
        tracing::info!(id, "updated budget");
        self.budgets[index] = budget;
        Ok(&self.budgets[index])
    }

    pub fn delete_budget(&mut self, id: &str) -> Result<Budget, Error> {
        let index = self
            .budgets
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| Error::BudgetNotFound(id.to_string()))?;
        tracing::info!(id, "deleted budget");
        Ok(self.budgets.remove(index))
    }

    // ── Bulk ──────────────────────────────────────────────────

    pub fn replace_all(&mut self, transactions: Vec<Transaction>, budgets: Vec<Budget>) -> Result<(), Error> {
        let mut ids = HashSet::new();
        for (i, txn) in transactions.iter().enumerate() {
            txn.check()
                .map_err(|e| Error::ImportFormat(format!("transaction {}: {e}", i + 1)))?;
            if !ids.insert(txn.id.as_str()) {
                return Err(Error::ImportFormat(format!(
                    "transaction ID \"{}\" appears more than once",
                    txn.id
                )));
            }
        }

        let mut categories = HashSet::new();
        for (i, budget) in budgets.iter().enumerate() {
            budget
                .check()
                .map_err(|e| Error::ImportFormat(format!("budget {}: {e}", i + 1)))?;
            if !categories.insert(budget.category.as_str()) {
                return Err(Error::ImportFormat(format!(
                    "more than one budget for \"{}\"",
                    budget.category
                )));
            }
        }

        tracing::info!(
            transactions = transactions.len(),
            budgets = budgets.len(),
            "replaced all records"
        );
        self.transactions = transactions;
        self.budgets = budgets;
        Ok(())
    }

    pub fn reset(&mut self) {
        tracing::info!("cleared all transactions and budgets");
        self.transactions.clear();
        self.budgets.clear();
    }

    fn ensure_category_free(&self, category: &str, editing: Option<&str>) -> Result<(), Error> {
        let taken = self
            .budgets
            .iter()
            .any(|b| b.category == category && Some(b.id.as_str()) != editing);
        if taken {
            return Err(Error::DuplicateBudgetCategory(category.to_string()));
        }
        Ok(())
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
