pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id        TEXT PRIMARY KEY,
    position  INTEGER NOT NULL,
    amount    TEXT NOT NULL,
    kind      TEXT NOT NULL,
    category  TEXT NOT NULL,
    date      TEXT NOT NULL,
    notes     TEXT,
    recurring BOOLEAN NOT NULL DEFAULT 0,
    icon      TEXT
);

CREATE INDEX IF NOT EXISTS idx_transactions_position ON transactions(position);

CREATE TABLE IF NOT EXISTS budgets (
    id       TEXT PRIMARY KEY,
    position INTEGER NOT NULL,
    category TEXT NOT NULL UNIQUE,
    amount   TEXT NOT NULL,
    icon     TEXT
);

CREATE TABLE IF NOT EXISTS settings (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];

// Keys in the settings table.
pub(crate) const KEY_STATE_VERSION: &str = "state_version";
pub(crate) const KEY_THEME: &str = "theme";
pub(crate) const KEY_DARK_MODE: &str = "dark_mode";
pub(crate) const KEY_CHART_TYPE: &str = "chart_type";
pub(crate) const KEY_TREND_CHART_TYPE: &str = "trend_chart_type";
