//! Template evaluation.
//!
//! [`evaluate`] never fails: an expression that cannot be evaluated is
//! replaced by [`ERROR_MARKER`] and the rest of the template still renders.
//! [`evaluate_with_diagnostics`] does the same and also reports why.

use labelgen_diagnostics::{Diagnostic, Span, codes};

use super::ast::Expr;
use super::context::{EvalContext, Row};
use super::functions::{self, ArgError};
use super::parser::{self, ParseError};
use super::template::{self, OPEN, Segment};

/// Output substituted for an expression that failed to evaluate.
pub const ERROR_MARKER: &str = "#ERR#";

/// Why a single expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum EvalError {
    /// Malformed expression body.
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    /// Call to a function that is not in the table.
    #[error("unknown function {name}")]
    UnknownFunction {
        /// The name as written.
        name: String,
        /// Span of the call.
        span: Span,
    },

    /// Wrong number of arguments.
    #[error("{name} expects {expected} argument(s), got {got}")]
    Arity {
        /// Function name.
        name: String,
        /// Accepted arity, e.g. `"0 to 1"`.
        expected: String,
        /// Number of arguments supplied.
        got: usize,
        /// Span of the call.
        span: Span,
    },

    /// A numeric argument did not parse or was out of range.
    #[error("{function}: '{value}' is not a valid number here")]
    InvalidNumber {
        /// Function name.
        function: String,
        /// The offending argument value.
        value: String,
        /// Span of the call.
        span: Span,
    },

    /// A date argument did not parse.
    #[error("{function}: '{value}' is not a date")]
    InvalidDate {
        /// Function name.
        function: String,
        /// The offending argument value.
        value: String,
        /// Span of the call.
        span: Span,
    },
}

impl EvalError {
    /// Span within the template the error points at.
    pub fn span(&self) -> Span {
        match self {
            EvalError::Syntax(e) => e.span,
            EvalError::UnknownFunction { span, .. }
            | EvalError::Arity { span, .. }
            | EvalError::InvalidNumber { span, .. }
            | EvalError::InvalidDate { span, .. } => *span,
        }
    }

    /// Diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            EvalError::Syntax(_) => codes::EXPRESSION_SYNTAX,
            EvalError::UnknownFunction { .. } => codes::UNKNOWN_FUNCTION,
            EvalError::Arity { .. } => codes::ARITY,
            EvalError::InvalidNumber { .. } => codes::INVALID_NUMBER,
            EvalError::InvalidDate { .. } => codes::INVALID_DATE,
        }
    }

    /// Convert into an error diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string(), Some(self.span()));
        match self {
            EvalError::UnknownFunction { name, .. }
            | EvalError::Arity { name, .. }
            | EvalError::InvalidNumber { function: name, .. }
            | EvalError::InvalidDate { function: name, .. } => {
                diag.with_context_entry("function", name.clone())
            }
            EvalError::Syntax(_) => diag,
        }
    }
}

/// How a bare word that is not a column name resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Miss {
    /// To the empty string (top-level references).
    Empty,
    /// To the word itself (function arguments, final `||` alternative).
    Literal,
}

/// Whether a binding contains an expression span.
pub fn is_expression<'a>(binding: impl Into<Option<&'a str>>) -> bool {
    binding.into().is_some_and(|s| s.contains(OPEN))
}

/// Evaluate a template against a row.
///
/// `None` yields `""`; text without `{{` is returned verbatim.
pub fn evaluate<'a>(template: impl Into<Option<&'a str>>, row: &Row, ctx: &EvalContext) -> String {
    let Some(template) = template.into() else {
        return String::new();
    };
    if !template.contains(OPEN) {
        return template.to_string();
    }
    render(template, row, ctx, None)
}

/// Evaluate a template and collect a diagnostic for every span that
/// rendered as [`ERROR_MARKER`] or was left unclosed.
pub fn evaluate_with_diagnostics(
    template: &str,
    row: &Row,
    ctx: &EvalContext,
) -> (String, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let out = render(template, row, ctx, Some(&mut diagnostics));
    (out, diagnostics)
}

/// Evaluate a single expression body (the text inside `{{ }}`).
pub fn evaluate_expression(body: &str, row: &Row, ctx: &EvalContext) -> Result<String, EvalError> {
    let expr = parser::parse(body, 0)?;
    eval(&expr, Miss::Empty, row, ctx)
}

/// Check a template without data: syntax, unknown functions and arity.
///
/// Argument values are not checked, since they usually come from columns
/// that only exist at print time.
pub fn analyze(template: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for segment in template::split(template) {
        match segment {
            Segment::Literal { .. } => {}
            Segment::Unclosed { span, .. } => diagnostics.push(unclosed_diagnostic(span)),
            Segment::Expr {
                body,
                body_start,
                span,
            } => {
                if body.trim().is_empty() {
                    diagnostics.push(empty_diagnostic(span));
                    continue;
                }
                match parser::parse(body, body_start) {
                    Ok(expr) => expr.for_each_call(&mut |name, args, span| {
                        if let Err(e) = check_call(name, args.len(), span) {
                            diagnostics.push(e.to_diagnostic());
                        }
                    }),
                    Err(e) => diagnostics.push(EvalError::from(e).to_diagnostic()),
                }
            }
        }
    }
    diagnostics
}

// ── Element helpers ─────────────────────────────────────────────────────

/// Anything that carries a binding and a static fallback text.
pub trait Bound {
    /// Column name or `{{…}}` template, if any.
    fn binding(&self) -> Option<&str>;
    /// Static text used when there is no usable binding.
    fn text_content(&self) -> Option<&str>;
}

/// Resolve the display text of an element.
///
/// An expression binding is evaluated; a plain binding is a column name
/// (case-insensitive) falling back to `text_content` when the column is
/// missing; no binding means `text_content`, or `""`.
pub fn resolve_text<B: Bound + ?Sized>(element: &B, row: &Row, ctx: &EvalContext) -> String {
    resolve_bound(element, row, ctx)
}

/// Resolve the payload encoded by a barcode or QR element.
///
/// Same strategy as [`resolve_text`]; kept as its own entry point so code
/// payloads can diverge from display text without touching callers.
pub fn resolve_code_value<B: Bound + ?Sized>(element: &B, row: &Row, ctx: &EvalContext) -> String {
    resolve_bound(element, row, ctx)
}

fn resolve_bound<B: Bound + ?Sized>(element: &B, row: &Row, ctx: &EvalContext) -> String {
    let fallback = || element.text_content().unwrap_or_default().to_string();
    match element.binding() {
        Some(binding) if is_expression(binding) => evaluate(binding, row, ctx),
        Some(binding) if !binding.is_empty() => row
            .get(binding)
            .map_or_else(fallback, str::to_string),
        _ => fallback(),
    }
}

// ── Rendering ───────────────────────────────────────────────────────────

fn render(
    template: &str,
    row: &Row,
    ctx: &EvalContext,
    mut diagnostics: Option<&mut Vec<Diagnostic>>,
) -> String {
    let mut out = String::with_capacity(template.len());
    for segment in template::split(template) {
        match segment {
            Segment::Literal { text, .. } => out.push_str(text),
            Segment::Unclosed { text, span } => {
                out.push_str(text);
                if let Some(d) = diagnostics.as_deref_mut() {
                    d.push(unclosed_diagnostic(span));
                }
            }
            Segment::Expr {
                body,
                body_start,
                span,
            } => {
                if body.trim().is_empty() {
                    if let Some(d) = diagnostics.as_deref_mut() {
                        d.push(empty_diagnostic(span));
                    }
                    continue;
                }
                let result = parser::parse(body, body_start)
                    .map_err(EvalError::from)
                    .and_then(|expr| eval(&expr, Miss::Empty, row, ctx));
                match result {
                    Ok(value) => out.push_str(&value),
                    Err(e) => {
                        out.push_str(ERROR_MARKER);
                        if let Some(d) = diagnostics.as_deref_mut() {
                            d.push(e.to_diagnostic());
                        }
                    }
                }
            }
        }
    }
    out
}

fn eval(expr: &Expr, miss: Miss, row: &Row, ctx: &EvalContext) -> Result<String, EvalError> {
    match expr {
        Expr::Literal { text } => Ok(text.clone()),
        Expr::Word { text } => Ok(match row.get(text) {
            Some(value) => value.to_string(),
            None if miss == Miss::Literal => text.clone(),
            None => String::new(),
        }),
        Expr::Default { alternatives } => {
            let last = alternatives.len().saturating_sub(1);
            for (i, alt) in alternatives.iter().enumerate() {
                let mode = if i == last { Miss::Literal } else { Miss::Empty };
                let value = eval(alt, mode, row, ctx)?;
                if !value.is_empty() || i == last {
                    return Ok(value);
                }
            }
            Ok(String::new())
        }
        Expr::Compare { lhs, op, rhs } => {
            let l = eval(lhs, Miss::Literal, row, ctx)?;
            let r = eval(rhs, Miss::Literal, row, ctx)?;
            Ok(functions::compare(&l, *op, &r).to_string())
        }
        Expr::Call { name, args, span } => {
            let function = check_call(name, args.len(), *span)?;
            let values = args
                .iter()
                .map(|arg| eval(arg, Miss::Literal, row, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            function
                .call(&values, ctx)
                .map_err(|e| arg_error(name, e, *span))
        }
    }
}

fn check_call(
    name: &str,
    argc: usize,
    span: Span,
) -> Result<&'static functions::Function, EvalError> {
    let function = functions::lookup(name).ok_or_else(|| EvalError::UnknownFunction {
        name: name.to_string(),
        span,
    })?;
    if !function.accepts(argc) {
        return Err(EvalError::Arity {
            name: name.to_string(),
            expected: function.arity(),
            got: argc,
            span,
        });
    }
    Ok(function)
}

fn arg_error(function: &str, err: ArgError, span: Span) -> EvalError {
    let function = function.to_string();
    match err {
        ArgError::NotANumber(value) | ArgError::OutOfRange(value) => EvalError::InvalidNumber {
            function,
            value,
            span,
        },
        ArgError::NotADate(value) => EvalError::InvalidDate {
            function,
            value,
            span,
        },
    }
}

fn unclosed_diagnostic(span: Span) -> Diagnostic {
    Diagnostic::warn(
        codes::UNCLOSED_EXPRESSION,
        "'{{' is never closed; the rest of the text prints literally",
        Some(span),
    )
}

fn empty_diagnostic(span: Span) -> Diagnostic {
    Diagnostic::info(codes::EMPTY_EXPRESSION, "empty expression", Some(span))
}
