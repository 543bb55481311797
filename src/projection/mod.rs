//! Month projection: the effective transaction set of a calendar month.
//!
//! A month's effective set is every transaction recorded in that month plus
//! one synthesized entry for each recurring transaction anchored in an
//! earlier month. Projected entries borrow their source and are rebuilt on
//! every call; they are never written back to the store.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Transaction, TransactionType, YearMonth};

/// One transaction in a month's effective set.
#[derive(Debug, Clone, PartialEq)]
pub enum MonthEntry<'a> {
    Actual(&'a Transaction),
    Projected {
        source: &'a Transaction,
        id: String,
        date: NaiveDate,
    },
}

impl<'a> MonthEntry<'a> {
    pub fn source(&self) -> &'a Transaction {
        match self {
            Self::Actual(txn) => txn,
            Self::Projected { source, .. } => source,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Actual(txn) => &txn.id,
            Self::Projected { id, .. } => id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Actual(txn) => txn.date,
            Self::Projected { date, .. } => *date,
        }
    }

    pub fn is_projected(&self) -> bool {
        matches!(self, Self::Projected { .. })
    }

    pub fn amount(&self) -> Decimal {
        self.source().amount
    }

    pub fn kind(&self) -> TransactionType {
        self.source().kind
    }

    pub fn category(&self) -> &'a str {
        &self.source().category
    }

    pub fn notes(&self) -> Option<&'a str> {
        self.source().notes.as_deref()
    }

    pub fn recurring(&self) -> bool {
        self.source().recurring
    }
}

/// Entries recorded in the month, projections dropped.
pub fn actual_only<'e, 'a>(entries: &'e [MonthEntry<'a>]) -> impl Iterator<Item = &'e MonthEntry<'a>> {
    entries.iter().filter(|e| !e.is_projected())
}

pub fn projected_only<'e, 'a>(entries: &'e [MonthEntry<'a>]) -> impl Iterator<Item = &'e MonthEntry<'a>> {
    entries.iter().filter(|e| e.is_projected())
}

/// Deterministic ID of a recurring transaction projected into `month`.
pub fn projected_id(source_id: &str, month: YearMonth) -> String {
    format!("projected-{source_id}-{month}")
}

/// Compute the effective transactions of `target`.
///
/// Actual entries come first, then projections; each group keeps the order
/// of `all`. A recurring transaction is projected into every month strictly
/// after its anchor month with no upper bound, and never into the anchor
/// month itself, where it already appears as an actual entry.
pub fn effective_transactions(target: YearMonth, all: &[Transaction]) -> Vec<MonthEntry<'_>> {
    let actuals = all
        .iter()
        .filter(|txn| target.contains(txn.date))
        .map(MonthEntry::Actual);

    let projections = all
        .iter()
        .filter(|txn| txn.recurring && txn.anchor_month() < target)
        .map(|txn| MonthEntry::Projected {
            source: txn,
            id: projected_id(&txn.id, target),
            date: target.first_day(),
        });

    let entries: Vec<MonthEntry<'_>> = actuals.chain(projections).collect();
    tracing::debug!(
        month = %target,
        total = entries.len(),
        projected = entries.iter().filter(|e| e.is_projected()).count(),
        "computed effective transactions"
    );
    entries
}

#[cfg(test)]
mod tests;
