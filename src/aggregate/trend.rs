use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Transaction, TransactionType, YearMonth};
use crate::projection::effective_transactions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    start: YearMonth,
    len: usize,
}

impl MonthWindow {
    /// `len` months finishing with `end`.
    pub fn ending_at(end: YearMonth, len: usize) -> Self {
        let back = i32::try_from(len.saturating_sub(1)).unwrap_or(i32::MAX);
        match end.offset(-back) {
            Some(start) => Self { start, len },
            // Clamped to the earliest representable month, still ending at `end`.
            None => {
                let start = YearMonth::of(NaiveDate::MIN);
                let span = usize::try_from(end.months_since(start)).unwrap_or(0) + 1;
                Self {
                    start,
                    len: span.min(len),
                }
            }
        }
    }

    /// `before` months, then `month`, then `after` months.
    pub fn centered_on(month: YearMonth, before: usize, after: usize) -> Self {
        let mut window = Self::ending_at(month, before + 1);
        window.len += after;
        window
    }

    pub fn months(&self) -> impl Iterator<Item = YearMonth> {
        std::iter::successors(Some(self.start), YearMonth::succ).take(self.len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    pub month: YearMonth,
    pub actual_income: Decimal,
    pub actual_expenses: Decimal,
    pub projected_income: Decimal,
    pub projected_expenses: Decimal,
    pub is_future: bool,
}

impl TrendPoint {
    pub fn expected_income(&self) -> Decimal {
        self.actual_income + self.projected_income
    }

    pub fn expected_expenses(&self) -> Decimal {
        self.actual_expenses + self.projected_expenses
    }
}

/// Income and expenses per month over `window`, split into recorded and
/// projected amounts.
///
/// Only months strictly after `now` may carry projected amounts; for the
/// current and past months the projected totals are always zero.
pub fn trend_series(all: &[Transaction], window: MonthWindow, now: YearMonth) -> Vec<TrendPoint> {
    window
        .months()
        .map(|month| {
            let is_future = month > now;
            let mut point = TrendPoint {
                month,
                actual_income: Decimal::ZERO,
                actual_expenses: Decimal::ZERO,
                projected_income: Decimal::ZERO,
                projected_expenses: Decimal::ZERO,
                is_future,
            };

            for entry in effective_transactions(month, all) {
                let slot = match (entry.is_projected(), entry.kind()) {
                    (false, TransactionType::Income) => &mut point.actual_income,
                    (false, TransactionType::Expense) => &mut point.actual_expenses,
                    (true, _) if !is_future => continue,
                    (true, TransactionType::Income) => &mut point.projected_income,
                    (true, TransactionType::Expense) => &mut point.projected_expenses,
                };
                *slot += entry.amount();
            }

            point
        })
        .collect()
}
