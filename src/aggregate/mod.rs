//! Pure reducers over a month's effective transactions.

mod summary;
mod trend;

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::format::format_amount;
use crate::models::{Budget, TransactionType};
use crate::projection::MonthEntry;

pub use summary::MonthSummary;
pub use trend::{trend_series, MonthWindow, TrendPoint};

const WARNING_PERCENTAGE: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl TypeTotals {
    pub fn balance(&self) -> Decimal {
        self.income - self.expense
    }
}

/// Sum amounts per transaction type.
pub fn totals_by_type<'e, 'a: 'e, I>(entries: I) -> TypeTotals
where
    I: IntoIterator<Item = &'e MonthEntry<'a>>,
{
    entries
        .into_iter()
        .fold(TypeTotals::default(), |mut totals, entry| {
            match entry.kind() {
                TransactionType::Income => totals.income += entry.amount(),
                TransactionType::Expense => totals.expense += entry.amount(),
            }
            totals
        })
}

/// Sum amounts of one transaction type per category, keyed in label order.
pub fn totals_by_category<'e, 'a: 'e, I>(entries: I, kind: TransactionType) -> BTreeMap<String, Decimal>
where
    I: IntoIterator<Item = &'e MonthEntry<'a>>,
{
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for entry in entries.into_iter().filter(|e| e.kind() == kind) {
        *totals.entry(entry.category().to_string()).or_default() += entry.amount();
    }
    totals
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLevel {
    Ok,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetStatus {
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
    pub is_over: bool,
}

impl BudgetStatus {
    pub fn level(&self) -> BudgetLevel {
        if self.percentage >= Decimal::ONE_HUNDRED {
            BudgetLevel::Danger
        } else if self.percentage >= WARNING_PERCENTAGE {
            BudgetLevel::Warning
        } else {
            BudgetLevel::Ok
        }
    }
}

/// Compare a budget against the category totals of a month.
pub fn budget_status(budget: &Budget, category_totals: &BTreeMap<String, Decimal>) -> BudgetStatus {
    let spent = category_totals
        .get(&budget.category)
        .copied()
        .unwrap_or_default();

    // Budgets are validated positive; a zero ceiling reports no progress
    // instead of dividing by it.
    let percentage = if budget.amount > Decimal::ZERO {
        spent
            .checked_div(budget.amount)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(Decimal::ONE_HUNDRED, |p| p.min(Decimal::ONE_HUNDRED))
    } else {
        Decimal::ZERO
    };

    BudgetStatus {
        spent,
        remaining: budget.amount - spent,
        percentage,
        is_over: spent > budget.amount,
    }
}

pub fn budget_statuses<'b>(
    budgets: &'b [Budget],
    category_totals: &BTreeMap<String, Decimal>,
) -> Vec<(&'b Budget, BudgetStatus)> {
    budgets
        .iter()
        .map(|budget| (budget, budget_status(budget, category_totals)))
        .collect()
}

pub fn overall_budget(budgets: &[Budget]) -> Decimal {
    budgets.iter().map(|b| b.amount).sum()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetWarning {
    OverallExceeded {
        spent: Decimal,
        budget: Decimal,
    },
    CategoryExceeded {
        category: String,
        spent: Decimal,
        budget: Decimal,
    },
}

impl BudgetWarning {
    pub fn title(&self) -> String {
        match self {
            Self::OverallExceeded { .. } => "Overall Budget Exceeded".to_string(),
            Self::CategoryExceeded { category, .. } => format!("{category} Budget Exceeded"),
        }
    }

    pub fn message(&self) -> String {
        let (spent, budget) = match self {
            Self::OverallExceeded { spent, budget }
            | Self::CategoryExceeded { spent, budget, .. } => (*spent, *budget),
        };
        format!(
            "You've spent {} of your {} budget.",
            format_amount(spent),
            format_amount(budget)
        )
    }
}

/// Budget warnings for realized spending.
///
/// Projected entries are skipped: warnings only reflect money actually spent.
/// The overall warning and the per-category warnings are independent, so one
/// expense may trigger both.
pub fn budget_warnings<'e, 'a: 'e, I>(entries: I, budgets: &[Budget]) -> Vec<BudgetWarning>
where
    I: IntoIterator<Item = &'e MonthEntry<'a>>,
{
    let actual: Vec<&MonthEntry<'a>> = entries.into_iter().filter(|e| !e.is_projected()).collect();
    let mut warnings = Vec::new();

    let spent = totals_by_type(actual.iter().copied()).expense;
    let overall = overall_budget(budgets);
    if overall > Decimal::ZERO && spent > overall {
        warnings.push(BudgetWarning::OverallExceeded {
            spent,
            budget: overall,
        });
    }

    let by_category = totals_by_category(actual.iter().copied(), TransactionType::Expense);
    for budget in budgets {
        let status = budget_status(budget, &by_category);
        if status.is_over {
            warnings.push(BudgetWarning::CategoryExceeded {
                category: budget.category.clone(),
                spent: status.spent,
                budget: budget.amount,
            });
        }
    }

    warnings
}
