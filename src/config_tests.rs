#![allow(clippy::unwrap_used)]

use super::*;
use std::collections::HashMap;

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_explicit_db_path_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("nested").join("data.db");
    let config = Config::from_vars(vars(&[(DB_ENV, db.to_str().unwrap())])).unwrap();

    assert_eq!(config.db_path, db);
    assert!(db.parent().unwrap().is_dir());
    assert_eq!(config.log_filter, "warn");
    assert_eq!(config.trend_months, 6);
}

#[test]
fn test_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("data.db");
    let config = Config::from_vars(vars(&[
        (DB_ENV, db.to_str().unwrap()),
        (LOG_ENV, "budgetline=debug"),
        (TREND_MONTHS_ENV, " 12 "),
    ]))
    .unwrap();

    assert_eq!(config.log_filter, "budgetline=debug");
    assert_eq!(config.trend_months, 12);
}

#[test]
fn test_bad_trend_months() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("data.db");
    for bad in ["0", "six", "-1"] {
        let result = Config::from_vars(vars(&[
            (DB_ENV, db.to_str().unwrap()),
            (TREND_MONTHS_ENV, bad),
        ]));
        assert!(result.is_err(), "{bad}");
    }
}
