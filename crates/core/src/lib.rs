//! Label generation core library.
//!
//! Evaluates `{{…}}` template expressions against rows of tabular data and
//! turns label designs into ZPL II printer code. The main entry points are
//! [`evaluate`] for templates, [`generate`] / [`generate_batch`] for ZPL,
//! and [`check_design`] for up-front design diagnostics.

#![warn(missing_docs)]

/// Design checker.
pub mod check;
/// Label design model.
pub mod design;
/// Template expression language.
pub mod expr;
/// Field data escaping for `^FD`.
pub mod hex_escape;
/// ZPL II code generation.
pub mod zpl;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Evaluator
pub use expr::{
    Bound, ERROR_MARKER, EvalContext, EvalError, Row, analyze, evaluate, evaluate_with_diagnostics,
    is_expression, resolve_code_value, resolve_text,
};

// Design
pub use design::{Design, DesignError, Element, ElementKind};

// Generator
pub use zpl::{
    BarcodeFormat, FieldEscape, GenerateOptions, Resolution, generate, generate_batch,
    generate_batch_at, generate_batch_par, generate_label,
};

// Checker
pub use check::{CheckResult, check_design};

// Diagnostics (re-exported from the diagnostics crate)
pub use labelgen_diagnostics::{Diagnostic, Severity, Span, codes};
