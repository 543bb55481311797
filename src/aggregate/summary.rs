use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::{budget_warnings, overall_budget, totals_by_category, totals_by_type};
use super::{BudgetWarning, TypeTotals};
use crate::models::{Budget, Transaction, TransactionType, YearMonth};
use crate::projection::{actual_only, effective_transactions, projected_only};

/// Everything the dashboard shows for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSummary {
    pub month: YearMonth,
    pub is_future: bool,
    pub totals: TypeTotals,
    pub expenses_by_category: BTreeMap<String, Decimal>,
    pub overall_budget: Decimal,
    pub warnings: Vec<BudgetWarning>,
    pub actual_count: usize,
    pub projected_count: usize,
}

impl MonthSummary {
    pub fn compute(month: YearMonth, all: &[Transaction], budgets: &[Budget], now: YearMonth) -> Self {
        let entries = effective_transactions(month, all);
        let projected_count = projected_only(&entries).count();

        Self {
            month,
            is_future: month > now,
            totals: totals_by_type(&entries),
            expenses_by_category: totals_by_category(&entries, TransactionType::Expense),
            overall_budget: overall_budget(budgets),
            warnings: budget_warnings(&entries, budgets),
            actual_count: actual_only(&entries).count(),
            projected_count,
        }
    }

    pub fn income_label(&self) -> &'static str {
        if self.is_future {
            "Projected Income"
        } else {
            "Total Income"
        }
    }

    pub fn expenses_label(&self) -> &'static str {
        if self.is_future {
            "Projected Expenses"
        } else {
            "Total Expenses"
        }
    }

    pub fn balance_label(&self) -> &'static str {
        if self.is_future {
            "Projected Balance"
        } else {
            "Balance"
        }
    }
}
