use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::models::{Budget, Transaction};
use crate::store::STATE_VERSION;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    version: u32,
    transactions: &'a [Transaction],
    budgets: &'a [Budget],
    export_date: String,
}

pub fn export_json(
    transactions: &[Transaction],
    budgets: &[Budget],
    exported_at: DateTime<Utc>,
) -> serde_json::Result<String> {
    let doc = ExportDocument {
        version: STATE_VERSION,
        transactions,
        budgets,
        export_date: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    serde_json::to_string_pretty(&doc)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportPayload {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
}

/// `transactions` must be present and an array. `budgets` may be absent or
/// null, in which case no budgets are imported. Any entry that does not
/// parse rejects the whole payload.
pub fn parse_import(text: &str) -> Result<ImportPayload, Error> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::ImportFormat(format!("not valid JSON: {e}")))?;

    let Some(Value::Array(raw_txns)) = value.get("transactions") else {
        return Err(Error::ImportFormat(
            "\"transactions\" must be an array".into(),
        ));
    };

    let raw_budgets: &[Value] = match value.get("budgets") {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(Error::ImportFormat("\"budgets\" must be an array".into()));
        }
    };

    let transactions = raw_txns
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Transaction::deserialize(item)
                .map_err(|e| Error::ImportFormat(format!("transaction {}: {e}", i + 1)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let budgets = raw_budgets
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Budget::deserialize(item)
                .map_err(|e| Error::ImportFormat(format!("budget {}: {e}", i + 1)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ImportPayload {
        transactions,
        budgets,
    })
}
