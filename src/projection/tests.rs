#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn month(s: &str) -> YearMonth {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn make_txn(id: &str, date_str: &str, amount: Decimal, recurring: bool) -> Transaction {
    Transaction {
        id: id.into(),
        amount,
        kind: TransactionType::Expense,
        category: "Rent".into(),
        date: date(date_str),
        notes: None,
        recurring,
        icon: None,
    }
}

#[test]
fn test_actual_transactions_in_month() {
    let txns = vec![
        make_txn("a", "2024-01-05", dec!(10), false),
        make_txn("b", "2024-02-05", dec!(20), false),
        make_txn("c", "2024-01-31", dec!(30), false),
    ];
    let entries = effective_transactions(month("2024-01"), &txns);
    let ids: Vec<&str> = entries.iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert!(entries.iter().all(|e| !e.is_projected()));
}

#[test]
fn test_non_recurring_never_projected() {
    let txns = vec![make_txn("a", "2024-01-05", dec!(10), false)];
    assert!(effective_transactions(month("2024-02"), &txns).is_empty());
}

#[test]
fn test_recurring_projected_into_later_month() {
    let txns = vec![make_txn("rent", "2024-01-15", dec!(1000), true)];
    let entries = effective_transactions(month("2024-03"), &txns);
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert!(entry.is_projected());
    assert_eq!(entry.id(), "projected-rent-2024-03");
    assert_eq!(entry.date(), date("2024-03-01"));
    assert_eq!(entry.amount(), dec!(1000));
    assert_eq!(entry.category(), "Rent");
    assert_eq!(entry.kind(), TransactionType::Expense);
    assert_eq!(entry.source().date, date("2024-01-15"));
}

#[test]
fn test_recurring_not_projected_into_anchor_month() {
    let txns = vec![make_txn("rent", "2024-01-15", dec!(1000), true)];
    let entries = effective_transactions(month("2024-01"), &txns);
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].is_projected());
    assert_eq!(entries[0].id(), "rent");
}

#[test]
fn test_recurring_not_projected_before_anchor() {
    let txns = vec![make_txn("rent", "2024-05-01", dec!(1000), true)];
    assert!(effective_transactions(month("2024-04"), &txns).is_empty());
    assert!(effective_transactions(month("2023-12"), &txns).is_empty());
}

#[test]
fn test_anchor_month_shared_with_similar_transactions() {
    // Two recurring entries with the same category and date are both actual
    // in their anchor month and both projected afterwards.
    let txns = vec![
        make_txn("x", "2024-01-10", dec!(5), true),
        make_txn("y", "2024-01-10", dec!(5), true),
    ];
    let jan = effective_transactions(month("2024-01"), &txns);
    assert_eq!(jan.len(), 2);
    assert!(jan.iter().all(|e| !e.is_projected()));

    let feb = effective_transactions(month("2024-02"), &txns);
    let ids: Vec<&str> = feb.iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec!["projected-x-2024-02", "projected-y-2024-02"]);
}

#[test]
fn test_end_of_month_anchor_projects_into_short_month() {
    let txns = vec![make_txn("sub", "2024-01-31", dec!(9.99), true)];
    let feb = effective_transactions(month("2024-02"), &txns);
    assert_eq!(feb.len(), 1);
    assert_eq!(feb[0].date(), date("2024-02-01"));
}

#[test]
fn test_projection_has_no_horizon() {
    let txns = vec![make_txn("rent", "2024-01-01", dec!(1000), true)];
    let far = effective_transactions(month("2074-01"), &txns);
    assert_eq!(far.len(), 1);
    assert_eq!(far[0].id(), "projected-rent-2074-01");
}

#[test]
fn test_actuals_precede_projections_in_source_order() {
    let txns = vec![
        make_txn("r1", "2023-11-01", dec!(1), true),
        make_txn("a1", "2024-01-03", dec!(2), false),
        make_txn("r2", "2023-12-01", dec!(3), true),
        make_txn("a2", "2024-01-02", dec!(4), true),
    ];
    let entries = effective_transactions(month("2024-01"), &txns);
    let ids: Vec<&str> = entries.iter().map(|e| e.id()).collect();
    assert_eq!(
        ids,
        vec!["a1", "a2", "projected-r1-2024-01", "projected-r2-2024-01"]
    );
}

#[test]
fn test_projection_is_idempotent() {
    let txns = vec![
        make_txn("rent", "2024-01-01", dec!(1000), true),
        make_txn("food", "2024-03-09", dec!(40), false),
    ];
    let first = effective_transactions(month("2024-03"), &txns);
    let second = effective_transactions(month("2024-03"), &txns);
    assert_eq!(first, second);
}

#[test]
fn test_projection_leaves_input_untouched() {
    let txns = vec![make_txn("rent", "2024-01-15", dec!(1000), true)];
    let before = txns.clone();
    let _ = effective_transactions(month("2024-06"), &txns);
    assert_eq!(txns, before);
}

#[test]
fn test_projected_id_format() {
    assert_eq!(projected_id("abc", month("2025-09")), "projected-abc-2025-09");
}

#[test]
fn test_actual_and_projected_split() {
    let txns = vec![
        make_txn("rent", "2024-01-01", dec!(1000), true),
        make_txn("food", "2024-03-04", dec!(25), false),
    ];
    let entries = effective_transactions(month("2024-03"), &txns);

    let actual: Vec<&str> = actual_only(&entries).map(|e| e.id()).collect();
    let projected: Vec<&str> = projected_only(&entries).map(|e| e.id()).collect();
    assert_eq!(actual, vec!["food"]);
    assert_eq!(projected, vec!["projected-rent-2024-03"]);
}
