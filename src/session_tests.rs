#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::aggregate::BudgetWarning;
use crate::models::TransactionType;
use crate::store::SerializedState;

#[derive(Default)]
struct MemoryGateway {
    saved: Option<SerializedState>,
    saves: usize,
    fail_load: bool,
    fail_save: bool,
}

impl StateGateway for MemoryGateway {
    fn load(&self) -> anyhow::Result<Option<SerializedState>> {
        if self.fail_load {
            anyhow::bail!("disk on fire");
        }
        Ok(self.saved.clone())
    }

    fn save(&mut self, state: &SerializedState) -> anyhow::Result<()> {
        if self.fail_save {
            anyhow::bail!("quota exceeded");
        }
        self.saves += 1;
        self.saved = Some(state.clone());
        Ok(())
    }
}

fn month(s: &str) -> YearMonth {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn draft(amount: Decimal, kind: TransactionType, category: &str, date_str: &str) -> TransactionDraft {
    TransactionDraft {
        amount: Some(amount),
        kind: Some(kind),
        category: category.into(),
        date: Some(date(date_str)),
        ..Default::default()
    }
}

fn budget_draft(category: &str, amount: Decimal) -> BudgetDraft {
    BudgetDraft {
        category: category.into(),
        amount: Some(amount),
        icon: String::new(),
    }
}

fn open_empty(active: &str) -> Session<MemoryGateway> {
    Session::open(MemoryGateway::default(), month(active))
}

// ── Opening ───────────────────────────────────────────────────

#[test]
fn test_open_without_saved_state() {
    let mut session = open_empty("2024-01");
    assert!(session.store().transactions().is_empty());
    assert_eq!(session.active_month(), month("2024-01"));
    assert!(session.take_persist_error().is_none());
}

#[test]
fn test_open_restores_saved_state() {
    let mut first = open_empty("2024-01");
    first
        .add_transaction(draft(dec!(10), TransactionType::Expense, "Food", "2024-01-03"))
        .unwrap();
    first.set_theme("ocean");
    let saved = first.gateway().saved.clone();

    let gateway = MemoryGateway {
        saved,
        ..Default::default()
    };
    let second = Session::open(gateway, month("2024-05"));
    assert_eq!(second.store().transactions().len(), 1);
    assert_eq!(second.store().settings().theme, "ocean");
    assert_eq!(second.active_month(), month("2024-05"));
}

#[test]
fn test_open_with_unreadable_state_starts_empty() {
    let gateway = MemoryGateway {
        fail_load: true,
        ..Default::default()
    };
    let mut session = Session::open(gateway, month("2024-01"));
    assert!(session.store().transactions().is_empty());
    assert!(matches!(
        session.take_persist_error(),
        Some(Error::Persistence(msg)) if msg.contains("disk on fire")
    ));
}

// ── Persistence ───────────────────────────────────────────────

#[test]
fn test_each_mutation_saves() {
    let mut session = open_empty("2024-01");
    let txn = session
        .add_transaction(draft(dec!(10), TransactionType::Expense, "Food", "2024-01-03"))
        .unwrap();
    let budget = session.add_budget(budget_draft("Food", dec!(100))).unwrap();
    session.delete_transaction(&txn.id).unwrap();
    session.delete_budget(&budget.id).unwrap();
    assert_eq!(session.gateway().saves, 4);
}

#[test]
fn test_rejected_mutation_does_not_save() {
    let mut session = open_empty("2024-01");
    assert!(session
        .add_transaction(draft(Decimal::ZERO, TransactionType::Expense, "Food", "2024-01-03"))
        .is_err());
    assert!(session.delete_budget("missing").is_err());
    assert_eq!(session.gateway().saves, 0);
}

#[test]
fn test_failed_save_keeps_in_memory_change() {
    let gateway = MemoryGateway {
        fail_save: true,
        ..Default::default()
    };
    let mut session = Session::open(gateway, month("2024-01"));
    let txn = session
        .add_transaction(draft(dec!(10), TransactionType::Expense, "Food", "2024-01-03"))
        .unwrap();

    assert_eq!(session.store().transaction(&txn.id), Some(&txn));
    let err = session.take_persist_error().unwrap();
    assert!(matches!(err, Error::Persistence(msg) if msg.contains("quota exceeded")));
    assert!(session.take_persist_error().is_none());
}

#[test]
fn test_navigation_is_not_persisted() {
    let mut session = open_empty("2024-01");
    assert_eq!(session.next_month(), month("2024-02"));
    assert_eq!(session.prev_month(), month("2024-01"));
    assert_eq!(session.prev_month(), month("2023-12"));
    session.set_active_month(month("2030-06"));
    session.set_active_tab(Tab::Budgets);
    assert_eq!(session.store().settings().active_tab, Tab::Budgets);
    assert_eq!(session.gateway().saves, 0);
}

#[test]
fn test_dark_mode_toggle_saves_only_on_change() {
    let mut session = open_empty("2024-01");
    assert!(session.toggle_dark_mode());
    assert_eq!(session.gateway().saves, 1);

    session.set_theme("forest");
    assert!(session.toggle_dark_mode(), "custom theme pins the mode");
    assert_eq!(session.gateway().saves, 2);
}

#[test]
fn test_chart_preferences_persist() {
    let mut session = open_empty("2024-01");
    session.set_chart_type(CategoryChartType::Doughnut);
    session.set_trend_chart_type(TrendChartType::Bar);
    let saved = session.gateway().saved.as_ref().unwrap();
    assert_eq!(saved.chart_type, CategoryChartType::Doughnut);
    assert_eq!(saved.trend_chart_type, TrendChartType::Bar);
}

// ── Import / reset ────────────────────────────────────────────

#[test]
fn test_import_replaces_everything() {
    let mut session = open_empty("2024-01");
    session
        .add_transaction(draft(dec!(10), TransactionType::Expense, "Old", "2024-01-03"))
        .unwrap();

    let text = r#"{
        "version": 4,
        "transactions": [
            {"id": "x", "amount": 50, "type": "expense", "category": "Food", "date": "2024-01-10"},
            {"id": "y", "amount": 3000, "type": "income", "category": "Salary", "date": "2024-01-01", "recurring": true}
        ],
        "budgets": [{"id": "b", "category": "Food", "amount": 200}]
    }"#;
    assert_eq!(session.import_json(text).unwrap(), (2, 1));
    assert_eq!(session.store().transactions().len(), 2);
    assert!(session.store().transaction("x").is_some());
    assert_eq!(session.store().budgets().len(), 1);
    assert_eq!(
        session.gateway().saved.as_ref().unwrap().transactions.len(),
        2
    );
}

#[test]
fn test_import_not_an_array_leaves_state_untouched() {
    let mut session = open_empty("2024-01");
    let kept = session
        .add_transaction(draft(dec!(10), TransactionType::Expense, "Food", "2024-01-03"))
        .unwrap();
    let saves = session.gateway().saves;

    let err = session
        .import_json(r#"{"transactions": "not-an-array"}"#)
        .unwrap_err();
    assert!(matches!(err, Error::ImportFormat(_)));
    assert_eq!(session.store().transactions(), &[kept]);
    assert_eq!(session.gateway().saves, saves);
}

#[test]
fn test_import_with_duplicate_ids_is_rejected() {
    let mut session = open_empty("2024-01");
    let text = r#"{"transactions": [
        {"id": "x", "amount": 1, "type": "expense", "category": "A", "date": "2024-01-10"},
        {"id": "x", "amount": 2, "type": "expense", "category": "B", "date": "2024-01-11"}
    ]}"#;
    assert!(matches!(
        session.import_json(text),
        Err(Error::ImportFormat(_))
    ));
    assert!(session.store().transactions().is_empty());
}

#[test]
fn test_reset_clears_and_saves() {
    let mut session = open_empty("2024-01");
    session
        .add_transaction(draft(dec!(10), TransactionType::Expense, "Food", "2024-01-03"))
        .unwrap();
    session.add_budget(budget_draft("Food", dec!(100))).unwrap();
    session.reset();
    let saved = session.gateway().saved.as_ref().unwrap();
    assert!(saved.transactions.is_empty());
    assert!(saved.budgets.is_empty());
}

// ── Derived views ─────────────────────────────────────────────

#[test]
fn test_summary_for_active_month() {
    let mut session = open_empty("2024-01");
    session.add_budget(budget_draft("Food", dec!(200))).unwrap();
    session
        .add_transaction(draft(dec!(150), TransactionType::Expense, "Food", "2024-01-05"))
        .unwrap();
    session
        .add_transaction(draft(dec!(75), TransactionType::Expense, "Food", "2024-01-20"))
        .unwrap();

    let summary = session.summary(month("2024-01"));
    assert_eq!(summary.totals.expense, dec!(225));
    assert_eq!(summary.expenses_by_category.get("Food"), Some(&dec!(225)));
    assert!(!summary.is_future);
    assert!(summary.warnings.contains(&BudgetWarning::CategoryExceeded {
        category: "Food".into(),
        spent: dec!(225),
        budget: dec!(200),
    }));
}

#[test]
fn test_future_summary_includes_projections() {
    let mut session = open_empty("2024-01");
    let mut salary = draft(dec!(3000), TransactionType::Income, "Salary", "2024-01-25");
    salary.recurring = true;
    session.add_transaction(salary).unwrap();

    session.set_active_month(month("2024-04"));
    let summary = session.summary(month("2024-01"));
    assert!(summary.is_future);
    assert_eq!(summary.income_label(), "Projected Income");
    assert_eq!(summary.totals.income, dec!(3000));
    assert_eq!(summary.projected_count, 1);
}

#[test]
fn test_trend_ends_at_active_month() {
    let mut session = open_empty("2024-06");
    let mut rent = draft(dec!(1000), TransactionType::Expense, "Rent", "2024-01-01");
    rent.recurring = true;
    session.add_transaction(rent).unwrap();

    let points = session.trend(5, 0, month("2024-04"));
    let months: Vec<String> = points.iter().map(|p| p.month.to_string()).collect();
    assert_eq!(
        months,
        vec!["2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06"]
    );
    assert_eq!(points[0].actual_expenses, dec!(1000));
    assert_eq!(points[2].projected_expenses, Decimal::ZERO);
    assert_eq!(points[5].projected_expenses, dec!(1000));
}

#[test]
fn test_trend_can_look_ahead() {
    let mut session = open_empty("2024-03");
    let mut salary = draft(dec!(3000), TransactionType::Income, "Salary", "2024-01-25");
    salary.recurring = true;
    session.add_transaction(salary).unwrap();

    let points = session.trend(2, 2, month("2024-03"));
    assert_eq!(points.len(), 5);
    assert_eq!(points[0].month, month("2024-01"));
    assert_eq!(points[4].month, month("2024-05"));
    assert!(points[3].is_future);
    assert_eq!(points[4].expected_income(), dec!(3000));
    assert_eq!(points[2].expected_income(), Decimal::ZERO);
}
