//! CLI tests for the `labelgen eval` subcommand.

mod common;

use common::{labelgen_cmd, write_file};
use tempfile::TempDir;

#[test]
fn eval_with_row_json() {
    let dir = TempDir::new().unwrap();
    let row = write_file(&dir, "row.json", r#"{"nombre": "juan", "stock": 3}"#);
    let output = labelgen_cmd()
        .args(["eval", "{{MAYUS(nombre)}} {{SI(stock < 5, BAJO, OK)}}", "--row"])
        .arg(&row)
        .args(["--output", "json"])
        .output()
        .expect("run eval command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["value"], "JUAN BAJO");
    assert_eq!(json["diagnostics"].as_array().unwrap().len(), 0);
}

#[test]
fn eval_index_and_now() {
    let output = labelgen_cmd()
        .args([
            "eval",
            "{{LOTE(AAMMDD-###)}}",
            "--index",
            "4",
            "--now",
            "2026-03-15",
            "--output",
            "pretty",
        ])
        .output()
        .expect("run eval command");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "260315-005\n");
}

#[test]
fn eval_reports_broken_spans_without_failing() {
    let output = labelgen_cmd()
        .args(["eval", "a {{NOPE(x)}} b", "--output", "json"])
        .output()
        .expect("run eval command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["value"], "a #ERR# b");
    assert_eq!(json["diagnostics"][0]["id"], "LBL1001");
    assert_eq!(json["diagnostics"][0]["span"]["start"], 4);
}

#[test]
fn eval_pretty_diagnostics_go_to_stderr() {
    let output = labelgen_cmd()
        .args(["eval", "{{SI(a, b)}}", "--output", "pretty"])
        .output()
        .expect("run eval command");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "#ERR#\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("LBL1002"), "{stderr}");
}

#[test]
fn eval_row_must_be_an_object() {
    let dir = TempDir::new().unwrap();
    let row = write_file(&dir, "row.json", "[1, 2]");
    let output = labelgen_cmd()
        .args(["eval", "{{x}}", "--row"])
        .arg(&row)
        .output()
        .expect("run eval command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("is not a JSON object"));
}
