use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const DB_ENV: &str = "BUDGETLINE_DB";
pub(crate) const LOG_ENV: &str = "BUDGETLINE_LOG";
pub(crate) const TREND_MONTHS_ENV: &str = "BUDGETLINE_TREND_MONTHS";

const DEFAULT_LOG_FILTER: &str = "warn";
const DEFAULT_TREND_MONTHS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub db_path: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
    pub trend_months: usize,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = match set(DB_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create data directory: {}", parent.display())
                    })?;
                }
                path
            }
            None => default_db_path()?,
        };

        let trend_months = match set(TREND_MONTHS_ENV) {
            Some(raw) => {
                let n: usize = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{TREND_MONTHS_ENV} must be a whole number, got \"{raw}\""))?;
                if n == 0 {
                    anyhow::bail!("{TREND_MONTHS_ENV} must be at least 1");
                }
                n
            }
            None => DEFAULT_TREND_MONTHS,
        };

        Ok(Self {
            db_path,
            log_filter: set(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            trend_months,
        })
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "budgetline", "Budgetline")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("budgetline.db"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
