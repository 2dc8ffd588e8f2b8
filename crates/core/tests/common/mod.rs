//! Shared test helpers for `labelgen_core` integration tests.

#![allow(unreachable_pub)]

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use labelgen_core::{Design, Diagnostic, EvalContext, Row};

/// Reference time used by every integration test: 2026-03-15 10:30:00.
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 15)
        .and_then(|d| d.and_hms_opt(10, 30, 0))
        .expect("valid fixed date")
}

/// Evaluation context at [`fixed_now`] for the given row.
#[allow(dead_code)]
pub fn ctx_at(row_index: usize) -> EvalContext {
    EvalContext::new(fixed_now()).at_row(row_index)
}

/// Path to a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
}

/// The shipping label design fixture.
#[allow(dead_code)]
pub fn shipping_design() -> Design {
    Design::from_json(&read_fixture("shipping.json"))
        .unwrap_or_else(|e| panic!("failed to parse shipping.json: {e}"))
}

/// The three rows of the batch fixture.
#[allow(dead_code)]
pub fn shipping_rows() -> Vec<Row> {
    serde_json::from_str(&read_fixture("rows.json"))
        .unwrap_or_else(|e| panic!("failed to parse rows.json: {e}"))
}

/// Build a row from `(column, value)` pairs.
#[allow(dead_code)]
pub fn row(pairs: &[(&str, &str)]) -> Row {
    pairs.iter().copied().collect()
}

/// Lines of a generated label that start with `^FO`, in order.
#[allow(dead_code)]
pub fn element_lines(zpl: &str) -> Vec<&str> {
    zpl.lines().filter(|l| l.starts_with("^FO")).collect()
}

/// Find a diagnostic by code, panicking with the full list if absent.
#[allow(dead_code)]
pub fn find_diag<'a>(issues: &'a [Diagnostic], code: &str) -> &'a Diagnostic {
    issues
        .iter()
        .find(|d| d.id == code)
        .unwrap_or_else(|| panic!("expected diagnostic {code}, got {issues:?}"))
}

/// Decode `^FH_` field data back into the bytes a printer would print.
#[allow(dead_code)]
pub fn decode_field_hex(data: &str) -> Vec<u8> {
    let bytes = data.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'_' {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).expect("ascii escape");
            out.push(u8::from_str_radix(hex, 16).expect("hex escape"));
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    out
}
