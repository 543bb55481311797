use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::aggregate::{budget_statuses, overall_budget, totals_by_category, BudgetLevel};
use crate::config::Config;
use crate::exchange::{self, ExportFormat};
use crate::format::{format_amount, format_percentage, format_signed, truncate};
use crate::models::{CategoryChartType, Tab, TransactionType, TrendChartType, YearMonth};
use crate::projection::{effective_transactions, projected_only};
use crate::session::Session;
use crate::store::{BudgetDraft, StateGateway, TransactionDraft, TransactionFilter};

pub(crate) fn as_cli<G: StateGateway>(
    args: &[String],
    session: &mut Session<G>,
    config: &Config,
) -> Result<()> {
    let Some(command) = args.get(1) else {
        return cli_summary(&[], session);
    };
    let rest = &args[2..];

    let result = match command.as_str() {
        "summary" | "s" => cli_summary(rest, session),
        "list" | "ls" => cli_list(rest, session),
        "month" | "m" => cli_month(rest, session),
        "categories" => cli_categories(session),
        "add-txn" | "add" => cli_add_txn(rest, session),
        "edit-txn" => cli_edit_txn(rest, session),
        "delete-txn" => cli_delete_txn(rest, session),
        "budgets" | "b" => cli_budgets(rest, session),
        "set-budget" => cli_set_budget(rest, session),
        "edit-budget" => cli_edit_budget(rest, session),
        "delete-budget" => cli_delete_budget(rest, session),
        "trend" => cli_trend(rest, session, config),
        "export" => cli_export(rest, session),
        "import" => cli_import(rest, session),
        "settings" => cli_settings(rest, session),
        "reset" => cli_reset(rest, session),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budgetline {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    };

    if let Some(err) = session.take_persist_error() {
        eprintln!("Warning: {err}");
    }
    result
}

fn print_usage() {
    println!("Budgetline: local-only personal finance tracker");
    println!();
    println!("Usage: budgetline [command]");
    println!();
    println!("Commands:");
    println!("  summary [YYYY-MM]             Dashboard totals for a month (default)");
    println!("    --prev, --next              Step one month back or forward");
    println!("  list                          List transactions");
    println!("    --type <income|expense>     Only this type");
    println!("    --category <name>           Only this category (exact)");
    println!("    --search <text>             Match category or notes");
    println!("    --month <YYYY-MM>           Only transactions dated in this month");
    println!("  month [YYYY-MM]               A month's transactions, recurring ones projected");
    println!("  categories                    List every category in use");
    println!("  add-txn                       Record a transaction");
    println!("    --amount <n> --type <income|expense> --category <name>");
    println!("    [--date <YYYY-MM-DD>] [--notes <text>] [--icon <name>] [--recurring]");
    println!("  edit-txn <id> [flags]         Change a transaction (same flags, plus --no-recurring)");
    println!("  delete-txn <id>               Delete a transaction");
    println!("  budgets [YYYY-MM]             Budget progress for a month");
    println!("  set-budget --category <name> --amount <n> [--icon <name>]");
    println!("  edit-budget <id> [flags]      Change a budget");
    println!("  delete-budget <id>            Delete a budget");
    println!("  trend [YYYY-MM]               Income and expenses for the months ending here");
    println!("    --ahead <n>                 Also show n months after it");
    println!("  export <json|csv> [path]      Write all data to a file");
    println!("  import <file.json>            Replace all data with an exported file");
    println!("  settings [key value]          Show or change preferences");
    println!("    theme <name> | dark-mode | chart <pie|doughnut> | trend-chart <line|bar>");
    println!("  reset --yes                   Delete every transaction and budget");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

// ── Dashboard ─────────────────────────────────────────────────

fn cli_summary<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<()> {
    navigate(args, session)?;
    session.set_active_tab(Tab::Dashboard);
    let summary = session.summary(YearMonth::current());

    println!("Budgetline: {}", summary.month);
    println!("{}", "─".repeat(40));
    println!(
        "  {:<20} {}",
        format!("{}:", summary.income_label()),
        format_amount(summary.totals.income)
    );
    println!(
        "  {:<20} {}",
        format!("{}:", summary.expenses_label()),
        format_amount(summary.totals.expense)
    );
    println!(
        "  {:<20} {}",
        format!("{}:", summary.balance_label()),
        format_amount(summary.totals.balance())
    );
    println!(
        "  {:<20} {}",
        "Overall Budget:",
        format_amount(summary.overall_budget)
    );
    println!(
        "  {:<20} {} ({} projected)",
        "Transactions:",
        summary.actual_count + summary.projected_count,
        summary.projected_count
    );

    if !summary.expenses_by_category.is_empty() {
        println!();
        println!("Spending by Category:");
        for (name, amount) in &summary.expenses_by_category {
            println!("  {:<24} {}", truncate(name, 24), format_amount(*amount));
        }
    }

    if !summary.warnings.is_empty() {
        println!();
        for warning in &summary.warnings {
            println!("! {}: {}", warning.title(), warning.message());
        }
    }

    Ok(())
}

// ── Transactions ──────────────────────────────────────────────

fn cli_list<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<()> {
    let kind = match flag_value(args, "--type") {
        Some(raw) => Some(parse_type(raw)?),
        None => None,
    };
    let filter = TransactionFilter {
        search: flag_value(args, "--search").unwrap_or_default().to_string(),
        kind,
        category: flag_value(args, "--category").map(str::to_string),
    };
    let month = flag_value(args, "--month")
        .map(YearMonth::from_str)
        .transpose()?;

    session.set_active_tab(Tab::Transactions);
    let store = session.store();
    let txns: Vec<_> = store
        .filter_transactions(&filter)
        .into_iter()
        .filter(|t| month.is_none_or(|m| m.contains(t.date)))
        .collect();

    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<36}  {:<10}  {:<20}  {:>14}  {:<3}  Notes",
        "ID", "Date", "Category", "Amount", "Rec"
    );
    println!("{}", "─".repeat(100));
    for txn in txns {
        println!(
            "{:<36}  {:<10}  {:<20}  {:>14}  {:<3}  {}",
            txn.id,
            txn.date.format("%Y-%m-%d").to_string(),
            truncate(&txn.category, 20),
            format_signed(txn.amount, txn.kind),
            if txn.recurring { "yes" } else { "" },
            truncate(txn.notes.as_deref().unwrap_or_default(), 30),
        );
    }
    Ok(())
}

fn cli_month<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<()> {
    let month = navigate(args, session)?;
    let store = session.store();
    let entries = effective_transactions(month, store.transactions());

    if entries.is_empty() {
        println!("No transactions in {month}");
        return Ok(());
    }

    println!(
        "{:<10}  {:<20}  {:>14}  {:<9}  {:<26}  {:<30}  ID",
        "Date", "Category", "Amount", "", "Icon", "Notes"
    );
    println!("{}", "─".repeat(130));
    for entry in &entries {
        let tag = if entry.is_projected() {
            "projected"
        } else if entry.recurring() {
            "recurring"
        } else {
            ""
        };
        println!(
            "{:<10}  {:<20}  {:>14}  {:<9}  {:<26}  {:<30}  {}",
            entry.date().format("%Y-%m-%d").to_string(),
            truncate(entry.category(), 20),
            format_signed(entry.amount(), entry.kind()),
            tag,
            store.icon_for(entry.source()),
            truncate(entry.notes().unwrap_or_default(), 30),
            entry.id(),
        );
    }

    let projected = projected_only(&entries).count();
    if projected > 0 {
        println!();
        println!("{projected} recurring transaction(s) projected into {month}");
    }
    Ok(())
}

fn cli_categories<G: StateGateway>(session: &mut Session<G>) -> Result<()> {
    let categories = session.store().categories();
    if categories.is_empty() {
        println!("No categories");
    }
    for name in categories {
        println!("{name}");
    }
    Ok(())
}

fn cli_add_txn<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<()> {
    let mut draft = TransactionDraft {
        date: Some(chrono::Local::now().date_naive()),
        ..Default::default()
    };
    apply_txn_flags(&mut draft, args)?;

    let txn = session.add_transaction(draft)?;
    println!(
        "Added {} {} ({}) on {}{}",
        txn.kind,
        format_amount(txn.amount),
        txn.category,
        txn.date.format("%Y-%m-%d"),
        if txn.recurring { ", repeats monthly" } else { "" }
    );
    println!("ID: {}", txn.id);
    Ok(())
}

fn cli_edit_txn<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<()> {
    let id = positional(args).context("Usage: budgetline edit-txn <id> [flags]")?;
    let existing = session
        .store()
        .transaction(id)
        .ok_or_else(|| anyhow::anyhow!("No transaction with ID \"{id}\""))?;
    let mut draft = TransactionDraft::from_transaction(existing);
    apply_txn_flags(&mut draft, args)?;

    let txn = session.update_transaction(id, draft)?;
    println!("Updated {} ({})", txn.id, txn.category);
    Ok(())
}

fn cli_delete_txn<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<()> {
    let id = positional(args).context("Usage: budgetline delete-txn <id>")?;
    let txn = session.delete_transaction(id)?;
    println!(
        "Deleted {} {} ({})",
        txn.kind,
        format_amount(txn.amount),
        txn.category
    );
    Ok(())
}

fn apply_txn_flags(draft: &mut TransactionDraft, args: &[String]) -> Result<()> {
    if let Some(raw) = flag_value(args, "--amount") {
        draft.amount = Some(parse_amount(raw)?);
    }
    if let Some(raw) = flag_value(args, "--type") {
        draft.kind = Some(parse_type(raw)?);
    }
    if let Some(category) = flag_value(args, "--category") {
        draft.category = category.trim().to_string();
    }
    if let Some(raw) = flag_value(args, "--date") {
        draft.date = Some(parse_date(raw)?);
    }
    if let Some(notes) = flag_value(args, "--notes") {
        draft.notes = notes.trim().to_string();
    }
    if let Some(icon) = flag_value(args, "--icon") {
        draft.icon = icon.trim().to_string();
    }
    if has_flag(args, "--recurring") {
        draft.recurring = true;
    }
    if has_flag(args, "--no-recurring") {
        draft.recurring = false;
    }
    Ok(())
}

// ── Budgets ───────────────────────────────────────────────────

fn cli_budgets<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<()> {
    let month = navigate(args, session)?;
    session.set_active_tab(Tab::Budgets);
    let store = session.store();
    let budgets = store.budgets();

    println!("Budgets: {month}");
    println!("{}", "─".repeat(72));
    println!("  Overall Budget: {}", format_amount(overall_budget(budgets)));

    if budgets.is_empty() {
        println!("  No budgets set");
        return Ok(());
    }

    let entries = effective_transactions(month, store.transactions());
    let spent_by_category = totals_by_category(&entries, TransactionType::Expense);

    println!();
    for (budget, status) in budget_statuses(budgets, &spent_by_category) {
        let marker = match status.level() {
            BudgetLevel::Ok => " ",
            BudgetLevel::Warning => "~",
            BudgetLevel::Danger => "!",
        };
        let left = if status.remaining >= Decimal::ZERO {
            format!("Remaining: {}", format_amount(status.remaining))
        } else {
            format!("Over: {}", format_amount(status.remaining.abs()))
        };
        println!(
            "{marker} {:<20} {:>12}  Spent: {} ({})  {left}",
            truncate(&budget.category, 20),
            format_amount(budget.amount),
            format_amount(status.spent),
            format_percentage(status.percentage),
        );
        println!("    ID: {}", budget.id);
    }
    Ok(())
}

fn cli_set_budget<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<()> {
    let mut draft = BudgetDraft::default();
    apply_budget_flags(&mut draft, args)?;
    let budget = session.add_budget(draft)?;
    println!(
        "Budget for {} set to {}",
        budget.category,
        format_amount(budget.amount)
    );
    println!("ID: {}", budget.id);
    Ok(())
}

fn cli_edit_budget<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<()> {
    let id = positional(args).context("Usage: budgetline edit-budget <id> [flags]")?;
    let existing = session
        .store()
        .budget(id)
        .ok_or_else(|| anyhow::anyhow!("No budget with ID \"{id}\""))?;
    let mut draft = BudgetDraft {
        category: existing.category.clone(),
        amount: Some(existing.amount),
        icon: existing.icon_or_default().to_string(),
    };
    apply_budget_flags(&mut draft, args)?;

    let budget = session.update_budget(id, draft)?;
    println!(
        "Budget for {} is now {}",
        budget.category,
        format_amount(budget.amount)
    );
    Ok(())
}

fn cli_delete_budget<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<()> {
    let id = positional(args).context("Usage: budgetline delete-budget <id>")?;
    let budget = session.delete_budget(id)?;
    println!("Deleted budget for {}", budget.category);
    Ok(())
}

fn apply_budget_flags(draft: &mut BudgetDraft, args: &[String]) -> Result<()> {
    if let Some(category) = flag_value(args, "--category") {
        draft.category = category.trim().to_string();
    }
    if let Some(raw) = flag_value(args, "--amount") {
        draft.amount = Some(parse_amount(raw)?);
    }
    if let Some(icon) = flag_value(args, "--icon") {
        draft.icon = icon.trim().to_string();
    }
    Ok(())
}

// ── Trend ─────────────────────────────────────────────────────

fn cli_trend<G: StateGateway>(args: &[String], session: &mut Session<G>, config: &Config) -> Result<()> {
    let ahead = match flag_value(args, "--ahead") {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("Invalid --ahead value: {raw}"))?,
        None => 0,
    };
    navigate(args, session)?;
    let points = session.trend(
        config.trend_months.saturating_sub(1),
        ahead,
        YearMonth::current(),
    );

    println!(
        "{:<8}  {:>14}  {:>14}  {:>14}  {:>14}  {:>14}",
        "Month", "Income", "Expenses", "Proj. Income", "Proj. Expenses", "Net"
    );
    println!("{}", "─".repeat(90));
    for p in &points {
        println!(
            "{:<8}  {:>14}  {:>14}  {:>14}  {:>14}  {:>14}",
            format!("{}{}", p.month, if p.is_future { "*" } else { "" }),
            format_amount(p.actual_income),
            format_amount(p.actual_expenses),
            format_amount(p.projected_income),
            format_amount(p.projected_expenses),
            format_amount(p.expected_income() - p.expected_expenses()),
        );
    }
    if points.iter().any(|p| p.is_future) {
        println!();
        println!("* future month: recurring transactions projected");
    }
    Ok(())
}

// ── Exchange ──────────────────────────────────────────────────

fn cli_export<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<()> {
    let format = args
        .first()
        .and_then(|a| ExportFormat::parse(a))
        .context("Usage: budgetline export <json|csv> [path]")?;

    let output_path = args
        .get(1)
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            let name = exchange::default_file_name(format, chrono::Local::now().date_naive());
            format!("{home}/{name}")
        });

    let store = session.store();
    let contents = match format {
        ExportFormat::Json => {
            exchange::export_json(store.transactions(), store.budgets(), chrono::Utc::now())
                .context("Failed to serialize export")?
        }
        ExportFormat::Csv => exchange::export_csv(store.transactions(), store.budgets())?,
    };
    std::fs::write(&output_path, contents)
        .with_context(|| format!("Failed to write {output_path}"))?;

    tracing::info!(path = %output_path, format = format.extension(), "exported data");
    println!(
        "Exported {} transactions and {} budgets to {output_path}",
        store.transactions().len(),
        store.budgets().len()
    );
    Ok(())
}

fn cli_import<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<()> {
    let file_path = args
        .first()
        .context("Usage: budgetline import <file.json>")?;
    let path = shellexpand(file_path);
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;

    let (txns, budgets) = session.import_json(&text)?;
    println!("Imported {txns} transactions and {budgets} budgets");
    Ok(())
}

// ── Settings ──────────────────────────────────────────────────

fn cli_settings<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<()> {
    match args.first().map(String::as_str) {
        None => {}
        Some("theme") => {
            let theme = args.get(1).context("Usage: budgetline settings theme <name>")?;
            session.set_theme(theme.trim());
        }
        Some("dark-mode") => {
            let before = session.store().settings().dark_mode;
            if session.toggle_dark_mode() == before {
                println!("Dark mode only changes with the default theme");
            }
        }
        Some("chart") => {
            let raw = args.get(1).map(String::as_str).unwrap_or_default();
            let chart = CategoryChartType::parse(raw)
                .with_context(|| format!("Unknown chart type: {raw} (pie or doughnut)"))?;
            session.set_chart_type(chart);
        }
        Some("trend-chart") => {
            let raw = args.get(1).map(String::as_str).unwrap_or_default();
            let chart = TrendChartType::parse(raw)
                .with_context(|| format!("Unknown trend chart type: {raw} (line or bar)"))?;
            session.set_trend_chart_type(chart);
        }
        Some(other) => anyhow::bail!("Unknown setting: {other}"),
    }

    let settings = session.store().settings();
    println!("  {:<12} {}", "theme", settings.theme);
    println!(
        "  {:<12} {}",
        "dark-mode",
        if settings.dark_mode { "on" } else { "off" }
    );
    println!("  {:<12} {}", "chart", settings.chart_type.as_str());
    println!("  {:<12} {}", "trend-chart", settings.trend_chart_type.as_str());
    Ok(())
}

fn cli_reset<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<()> {
    if !has_flag(args, "--yes") {
        anyhow::bail!("This deletes every transaction and budget. Re-run with --yes to confirm");
    }
    session.reset();
    println!("All transactions and budgets deleted");
    Ok(())
}

// ── Argument helpers ──────────────────────────────────────────

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// First argument that is not a flag.
fn positional(args: &[String]) -> Option<&str> {
    args.first()
        .filter(|a| !a.starts_with('-'))
        .map(String::as_str)
}

fn month_arg(args: &[String]) -> Result<YearMonth> {
    match positional(args) {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(YearMonth::current()),
    }
}

/// Make the month named in `args` (default: this month) active, then apply
/// any `--prev` / `--next` steps.
fn navigate<G: StateGateway>(args: &[String], session: &mut Session<G>) -> Result<YearMonth> {
    session.set_active_month(month_arg(args)?);
    if has_flag(args, "--prev") {
        session.prev_month();
    }
    if has_flag(args, "--next") {
        session.next_month();
    }
    Ok(session.active_month())
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    let cleaned = raw.trim().replace(['$', ','], "");
    Decimal::from_str(&cleaned).with_context(|| format!("Invalid amount: {raw}"))
}

fn parse_type(raw: &str) -> Result<TransactionType> {
    TransactionType::parse(raw)
        .with_context(|| format!("Unknown transaction type: {raw} (income or expense)"))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {raw} (expected YYYY-MM-DD)"))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
