mod csv_export;
mod json;

use chrono::NaiveDate;

pub use csv_export::export_csv;
pub use json::{export_json, parse_import};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// `budget-data-<YYYY-MM-DD>.<ext>`
pub fn default_file_name(format: ExportFormat, today: NaiveDate) -> String {
    format!(
        "budget-data-{}.{}",
        today.format("%Y-%m-%d"),
        format.extension()
    )
}
