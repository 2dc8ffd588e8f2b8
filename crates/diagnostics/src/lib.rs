//! Diagnostics for labelgen.
//!
//! Provides [`Diagnostic`], [`Severity`] and [`Span`], used to report
//! problems found in label designs and template expressions. Diagnostic
//! codes are defined in the [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// The label will not print as designed.
    Error,
    /// The label prints, but probably not the way the author intended.
    Warn,
    /// Informational note.
    Info,
}

/// Byte span inside the text a diagnostic refers to (usually a binding).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Shift both ends by `offset` bytes.
    pub fn offset(self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

/// A diagnostic produced by the expression evaluator or the design checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"LBL1001"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Optional byte span in the source text this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Machine-readable context for tooling (`"element"`, `"function"`, ...).
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Error, message, span)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, span)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Info, message, span)
    }

    /// Attach machine-readable context metadata (builder pattern).
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Add a single context entry, creating the map if needed.
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    let text = match id {
        codes::UNKNOWN_FUNCTION => {
            "The expression calls a function that does not exist. Function names are \
             case-sensitive (MAYUS, MINUS, RECORTAR, CONCAT, REEMPLAZAR, LARGO, HOY, \
             SUMAR_DIAS, SUMAR_MESES, CONTADOR, LOTE, REDONDEAR, FORMATO_NUM, SI, VACIO, \
             POR_DEFECTO). The expression prints as #ERR#."
        }
        codes::ARITY => {
            "The function was called with the wrong number of arguments (arity). \
             The expression prints as #ERR#."
        }
        codes::INVALID_NUMBER => {
            "An argument that must be a number (count, decimals, counter start) could not \
             be parsed. The expression prints as #ERR#."
        }
        codes::INVALID_DATE => {
            "A date argument is not in YYYY-MM-DD, DD/MM/YYYY or RFC 3339 form. \
             The expression prints as #ERR#."
        }
        codes::EXPRESSION_SYNTAX => {
            "The expression body has unbalanced parentheses or an unterminated quote. \
             The expression prints as #ERR#."
        }
        codes::UNCLOSED_EXPRESSION => {
            "A '{{' has no matching '}}'. The remaining text is printed literally."
        }
        codes::EMPTY_EXPRESSION => "'{{}}' contains no expression and prints as nothing.",
        codes::INVALID_DIMENSIONS => {
            "Label width and height must be positive millimetre values."
        }
        codes::ELEMENT_OUT_OF_BOUNDS => {
            "The element extends past the edges of the label; the printer clips whatever \
             falls outside the printable area."
        }
        codes::PAGE_WIDTH_EXCEEDED => {
            "The label is wider than the printhead described by the printer profile."
        }
        codes::PAGE_LENGTH_EXCEEDED => {
            "The label is longer than the maximum label length of the printer profile."
        }
        codes::UNKNOWN_BARCODE_FORMAT => {
            "The barcode format is not supported; the element is encoded as Code 128."
        }
        codes::EMPTY_FIELD => {
            "The element has neither a binding nor static text, so it always prints empty."
        }
        _ => return None,
    };
    Some(text)
}
