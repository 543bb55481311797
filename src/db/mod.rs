mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::{Budget, CategoryChartType, Transaction, TransactionType, TrendChartType};
use crate::store::{SerializedState, StateGateway};

use schema::{KEY_CHART_TYPE, KEY_DARK_MODE, KEY_STATE_VERSION, KEY_THEME, KEY_TREND_CHART_TYPE};

/// SQLite-backed [`StateGateway`].
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::debug!(version = schema::CURRENT_VERSION, "created database schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::info!(from = current, to = schema::CURRENT_VERSION, "migrated database");
        }

        Ok(())
    }

    // ── Settings ──────────────────────────────────────────────

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    // ── Transactions ──────────────────────────────────────────

    fn get_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, kind, category, date, notes, recurring, icon
             FROM transactions ORDER BY position",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(TransactionRow {
                id: row.get(0)?,
                amount: row.get(1)?,
                kind: row.get(2)?,
                category: row.get(3)?,
                date: row.get(4)?,
                notes: row.get(5)?,
                recurring: row.get(6)?,
                icon: row.get(7)?,
            })
        })?;
        let txns = rows
            .map(|row| -> Result<Transaction> { row?.into_transaction() })
            .collect::<Result<Vec<_>>>()?;
        Ok(txns)
    }

    // ── Budgets ───────────────────────────────────────────────

    fn get_budgets(&self) -> Result<Vec<Budget>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, category, amount, icon FROM budgets ORDER BY position")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;
        let budgets = rows
            .map(|row| -> Result<Budget> {
                let (id, category, amount, icon) = row?;
                Ok(Budget {
                    amount: parse_amount(&amount)
                        .with_context(|| format!("Budget {id} has an unreadable amount"))?,
                    id,
                    category,
                    icon,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(budgets)
    }
}

impl StateGateway for Database {
    fn load(&self) -> Result<Option<SerializedState>> {
        let Some(version) = self.get_setting(KEY_STATE_VERSION)? else {
            return Ok(None);
        };
        let version: u32 = version
            .parse()
            .with_context(|| format!("Invalid stored state version: {version}"))?;

        let mut state = SerializedState {
            version,
            transactions: self.get_transactions()?,
            budgets: self.get_budgets()?,
            ..SerializedState::default()
        };

        if let Some(theme) = self.get_setting(KEY_THEME)? {
            state.theme = theme;
        }
        if let Some(dark) = self.get_setting(KEY_DARK_MODE)? {
            state.dark_mode = dark == "1" || dark == "true";
        }
        if let Some(chart) = self.get_setting(KEY_CHART_TYPE)? {
            match CategoryChartType::parse(&chart) {
                Some(c) => state.chart_type = c,
                None => tracing::warn!(value = %chart, "ignoring unknown chart type"),
            }
        }
        if let Some(chart) = self.get_setting(KEY_TREND_CHART_TYPE)? {
            match TrendChartType::parse(&chart) {
                Some(c) => state.trend_chart_type = c,
                None => tracing::warn!(value = %chart, "ignoring unknown trend chart type"),
            }
        }

        tracing::debug!(
            transactions = state.transactions.len(),
            budgets = state.budgets.len(),
            "loaded saved state"
        );
        Ok(Some(state))
    }

    fn save(&mut self, state: &SerializedState) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM transactions", [])?;
        tx.execute("DELETE FROM budgets", [])?;

        for (position, txn) in state.transactions.iter().enumerate() {
            tx.execute(
                "INSERT INTO transactions (id, position, amount, kind, category, date, notes, recurring, icon)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    txn.id,
                    position as i64,
                    txn.amount.to_string(),
                    txn.kind.as_str(),
                    txn.category,
                    txn.date.format("%Y-%m-%d").to_string(),
                    txn.notes,
                    txn.recurring,
                    txn.icon,
                ],
            )
            .with_context(|| format!("Failed to save transaction {}", txn.id))?;
        }

        for (position, budget) in state.budgets.iter().enumerate() {
            tx.execute(
                "INSERT INTO budgets (id, position, category, amount, icon)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    budget.id,
                    position as i64,
                    budget.category,
                    budget.amount.to_string(),
                    budget.icon,
                ],
            )
            .with_context(|| format!("Failed to save budget {}", budget.id))?;
        }

        let settings = [
            (KEY_STATE_VERSION, state.version.to_string()),
            (KEY_THEME, state.theme.clone()),
            (KEY_DARK_MODE, if state.dark_mode { "1" } else { "0" }.to_string()),
            (KEY_CHART_TYPE, state.chart_type.as_str().to_string()),
            (KEY_TREND_CHART_TYPE, state.trend_chart_type.as_str().to_string()),
        ];
        for (key, value) in &settings {
            tx.execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
        }

        tx.commit().context("Failed to commit saved state")?;
        tracing::debug!(
            transactions = state.transactions.len(),
            budgets = state.budgets.len(),
            "saved state"
        );
        Ok(())
    }
}

struct TransactionRow {
    id: String,
    amount: String,
    kind: String,
    category: String,
    date: String,
    notes: Option<String>,
    recurring: bool,
    icon: Option<String>,
}

impl TransactionRow {
    fn into_transaction(self) -> Result<Transaction> {
        let amount = parse_amount(&self.amount)
            .with_context(|| format!("Transaction {} has an unreadable amount", self.id))?;
        let kind = TransactionType::parse(&self.kind).with_context(|| {
            format!("Transaction {} has unknown type \"{}\"", self.id, self.kind)
        })?;
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .with_context(|| format!("Transaction {} has invalid date \"{}\"", self.id, self.date))?;

        Ok(Transaction {
            id: self.id,
            amount,
            kind,
            category: self.category,
            date,
            notes: self.notes,
            recurring: self.recurring,
            icon: self.icon,
        })
    }
}

fn parse_amount(s: &str) -> Result<Decimal> {
    Decimal::from_str(s).with_context(|| format!("Invalid amount: {s}"))
}
