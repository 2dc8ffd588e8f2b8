//! Design checker.
//!
//! Generation never fails, so problems in a design only show up as
//! `#ERR#` on paper or as clipped output. The checker finds them up front
//! and reports them as [`Diagnostic`]s.

use std::collections::BTreeMap;

use labelgen_diagnostics::{Diagnostic, Severity, codes};
use labelgen_profile::Profile;
use serde::Serialize;

use crate::design::{Design, Element, ElementKind};
use crate::expr::{Bound, analyze, is_expression};
use crate::zpl::{BarcodeFormat, Resolution};

/// Slack for floating-point geometry comparisons, in millimetres.
const EPSILON_MM: f64 = 1e-6;

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

/// Result of checking a design.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// `true` if no errors were found (warnings and info are allowed).
    pub ok: bool,
    /// All diagnostics, in element order.
    pub issues: Vec<Diagnostic>,
}

/// Check a design, optionally against a printer profile.
pub fn check_design(design: &Design, profile: Option<&Profile>) -> CheckResult {
    let mut issues = Vec::new();

    let dimensions_ok = check_dimensions(design, &mut issues);
    if dimensions_ok && let Some(profile) = profile {
        check_page(design, profile, &mut issues);
    }

    for element in &design.elements {
        if dimensions_ok {
            check_bounds(design, element, &mut issues);
        }
        check_element(element, &mut issues);
    }

    let ok = !issues.iter().any(|d| d.severity == Severity::Error);
    CheckResult { ok, issues }
}

fn check_dimensions(design: &Design, issues: &mut Vec<Diagnostic>) -> bool {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(design.width_mm) && valid(design.height_mm) {
        return true;
    }
    issues.push(
        Diagnostic::error(
            codes::INVALID_DIMENSIONS,
            format!(
                "label size {}×{} mm is not positive",
                design.width_mm, design.height_mm
            ),
            None,
        )
        .with_context(ctx!(
            "width_mm" => design.width_mm.to_string(),
            "height_mm" => design.height_mm.to_string(),
        )),
    );
    false
}

fn check_page(design: &Design, profile: &Profile, issues: &mut Vec<Diagnostic>) {
    let dpi = Resolution(profile.dpi);
    let width = dpi.mm_to_dots(design.width_mm);
    let height = dpi.mm_to_dots(design.height_mm);

    if let Some(max) = profile.max_width_dots()
        && width > max
    {
        issues.push(
            Diagnostic::warn(
                codes::PAGE_WIDTH_EXCEEDED,
                format!(
                    "label width {width} dots exceeds printhead width {max} dots of profile '{}'",
                    profile.id
                ),
                None,
            )
            .with_context(ctx!(
                "profile" => profile.id.clone(),
                "width_dots" => width.to_string(),
                "max_width_dots" => max.to_string(),
            )),
        );
    }
    if let Some(max) = profile.max_height_dots()
        && height > max
    {
        issues.push(
            Diagnostic::warn(
                codes::PAGE_LENGTH_EXCEEDED,
                format!(
                    "label length {height} dots exceeds maximum {max} dots of profile '{}'",
                    profile.id
                ),
                None,
            )
            .with_context(ctx!(
                "profile" => profile.id.clone(),
                "height_dots" => height.to_string(),
                "max_height_dots" => max.to_string(),
            )),
        );
    }
}

fn check_bounds(design: &Design, element: &Element, issues: &mut Vec<Diagnostic>) {
    let inside = element.x >= -EPSILON_MM
        && element.y >= -EPSILON_MM
        && element.x + element.width.max(0.0) <= design.width_mm + EPSILON_MM
        && element.y + element.height.max(0.0) <= design.height_mm + EPSILON_MM;
    if inside {
        return;
    }
    issues.push(
        Diagnostic::warn(
            codes::ELEMENT_OUT_OF_BOUNDS,
            format!(
                "{} '{}' at ({}, {}) size {}×{} mm extends past the {}×{} mm label",
                element.type_name(),
                element.id,
                element.x,
                element.y,
                element.width,
                element.height,
                design.width_mm,
                design.height_mm
            ),
            None,
        )
        .with_context(ctx!("element" => element.id.clone())),
    );
}

fn check_element(element: &Element, issues: &mut Vec<Diagnostic>) {
    if let ElementKind::Barcode(barcode) = &element.kind
        && let Some(name) = barcode.barcode_format.as_deref()
        && BarcodeFormat::parse(name).is_none()
    {
        issues.push(
            Diagnostic::warn(
                codes::UNKNOWN_BARCODE_FORMAT,
                format!(
                    "barcode '{}' uses unknown format '{name}'; Code 128 will be used",
                    element.id
                ),
                None,
            )
            .with_context(ctx!("element" => element.id.clone(), "format" => name)),
        );
    }

    if !matches!(
        element.kind,
        ElementKind::Text(_) | ElementKind::Barcode(_) | ElementKind::Qr(_)
    ) {
        return;
    }

    let binding = element.binding().filter(|b| !b.is_empty());
    let text = element.text_content().filter(|t| !t.is_empty());
    let Some(binding) = binding else {
        if text.is_none() {
            issues.push(
                Diagnostic::info(
                    codes::EMPTY_FIELD,
                    format!(
                        "{} '{}' has no binding and no text",
                        element.type_name(),
                        element.id
                    ),
                    None,
                )
                .with_context(ctx!("element" => element.id.clone())),
            );
        }
        return;
    };

    if is_expression(binding) {
        for diag in analyze(binding) {
            issues.push(
                diag.with_context_entry("element", element.id.clone())
                    .with_context_entry("field", "binding")
                    .with_context_entry("template", binding),
            );
        }
    }
}
