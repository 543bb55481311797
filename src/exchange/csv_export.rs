use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::models::{Budget, Transaction};

/// Two CSV tables in one file: `TRANSACTIONS`, a blank line, then `BUDGETS`.
pub fn export_csv(transactions: &[Transaction], budgets: &[Budget]) -> Result<String> {
    let txn_rows = transactions.iter().map(|t| {
        vec![
            t.date.format("%Y-%m-%d").to_string(),
            t.kind.as_str().to_string(),
            t.category.clone(),
            t.amount.normalize().to_string(),
            t.notes.clone().unwrap_or_default(),
            if t.recurring { "Yes" } else { "No" }.to_string(),
        ]
    });
    let txn_table = write_table(
        &["Date", "Type", "Category", "Amount", "Notes", "Recurring"],
        txn_rows,
    )
    .context("Failed to write transactions table")?;

    let budget_rows = budgets
        .iter()
        .map(|b| vec![b.category.clone(), b.amount.normalize().to_string()]);
    let budget_table = write_table(&["Category", "Amount"], budget_rows)
        .context("Failed to write budgets table")?;

    Ok(format!(
        "TRANSACTIONS\n{txn_table}\nBUDGETS\n{}",
        budget_table.trim_end_matches('\n')
    ))
}

fn write_table(headers: &[&str], rows: impl Iterator<Item = Vec<String>>) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(headers)?;
    for row in rows {
        wtr.write_record(&row)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}
