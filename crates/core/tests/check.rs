//! Design checker tests against the broken-design fixture and printer
//! profiles.

mod common;

use common::{find_diag, fixture_path, shipping_design};
use labelgen_core::{Design, Severity, check_design, codes};
use labelgen_profile::load_profile_from_str;

fn broken_design() -> Design {
    let json = std::fs::read_to_string(fixture_path("broken.json")).unwrap();
    Design::from_json(&json).unwrap()
}

#[test]
fn shipping_fixture_is_clean() {
    let result = check_design(&shipping_design(), None);
    assert!(result.ok);
    assert!(result.issues.is_empty(), "{:?}", result.issues);
}

#[test]
fn broken_fixture_reports_every_problem() {
    let result = check_design(&broken_design(), None);
    assert!(!result.ok);

    let codes_found: Vec<_> = result.issues.iter().map(|d| d.id.to_string()).collect();
    assert_eq!(
        codes_found,
        vec![
            codes::UNKNOWN_FUNCTION,
            codes::ARITY,
            codes::ELEMENT_OUT_OF_BOUNDS,
            codes::UNKNOWN_BARCODE_FORMAT,
            codes::EMPTY_FIELD,
            codes::UNCLOSED_EXPRESSION,
        ]
    );
}

#[test]
fn diagnostics_name_their_element() {
    let result = check_design(&broken_design(), None);

    let unknown = find_diag(&result.issues, codes::UNKNOWN_FUNCTION);
    assert_eq!(unknown.severity, Severity::Error);
    let context = unknown.context.as_ref().unwrap();
    assert_eq!(context["element"], "titulo");
    assert_eq!(context["function"], "MAYUSCULAS");

    let arity = find_diag(&result.issues, codes::ARITY);
    assert_eq!(arity.context.as_ref().unwrap()["element"], "vence");
    // Span points at the call inside the binding text.
    let span = arity.span.unwrap();
    assert_eq!(
        &"Vence {{SUMAR_DIAS(fecha)}}"[span.start..span.end],
        "SUMAR_DIAS(fecha)"
    );

    let bounds = find_diag(&result.issues, codes::ELEMENT_OUT_OF_BOUNDS);
    assert_eq!(bounds.severity, Severity::Warn);
    assert_eq!(bounds.context.as_ref().unwrap()["element"], "codigo");
}

#[test]
fn profile_limits_are_checked() {
    let narrow = load_profile_from_str(
        r#"{"id":"desk-2in","schema_version":"1.0.0","dpi":203,
            "page":{"width_dots":448}}"#,
    )
    .unwrap();
    let result = check_design(&shipping_design(), Some(&narrow));
    assert!(result.ok);
    let diag = find_diag(&result.issues, codes::PAGE_WIDTH_EXCEEDED);
    assert!(diag.message.contains("800"));
    assert!(diag.message.contains("448"));

    let wide = load_profile_from_str(
        r#"{"id":"industrial","schema_version":"1.0.0","dpi":300,
            "page":{"width_dots":1248,"height_dots":12000}}"#,
    )
    .unwrap();
    assert!(check_design(&shipping_design(), Some(&wide)).issues.is_empty());
}

#[test]
fn check_result_serializes_for_tooling() {
    let result = check_design(&broken_design(), None);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["ok"], false);
    assert_eq!(json["issues"][0]["id"], codes::UNKNOWN_FUNCTION);
    assert_eq!(json["issues"][0]["severity"], "error");
}
