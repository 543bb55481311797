#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("rent", 10), "rent");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("rent", 4), "rent");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("groceries run", 5), "groc…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("rent", 0), "");
}

#[test]
fn test_truncate_one_char() {
    assert_eq!(truncate("rent", 1), "…");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("café résumé", 5), "café…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56)), "$1,234.56");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-0.01)), "-$0.01");
    assert_eq!(format_amount(dec!(-99999.01)), "-$99,999.01");
}

#[test]
fn test_format_amount_millions() {
    assert_eq!(format_amount(dec!(10000000)), "$10,000,000.00");
}

#[test]
fn test_format_amount_pads_to_two_decimals() {
    assert_eq!(format_amount(dec!(1.5)), "$1.50");
    assert_eq!(format_amount(dec!(5)), "$5.00");
}

// ── format_signed / format_percentage ─────────────────────────

#[test]
fn test_format_signed() {
    assert_eq!(format_signed(dec!(3000), TransactionType::Income), "+$3,000.00");
    assert_eq!(format_signed(dec!(42.5), TransactionType::Expense), "-$42.50");
}

#[test]
fn test_format_percentage() {
    assert_eq!(format_percentage(dec!(25)), "25.0%");
    assert_eq!(format_percentage(dec!(33.333)), "33.3%");
    assert_eq!(format_percentage(dec!(100)), "100.0%");
}
