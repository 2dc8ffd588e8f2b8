/// Parsed expression types.
pub mod ast;
/// Row data and per-label evaluation context.
pub mod context;
/// Template evaluation and element text resolution.
pub mod eval;
/// The built-in function table.
pub mod functions;
/// Expression parser for the body of a `{{ … }}` span.
pub mod parser;
/// Splits templates into literal text and expression spans.
pub mod template;

pub use ast::{CompareOp, Expr};
pub use context::{EvalContext, Row};
pub use eval::{
    Bound, ERROR_MARKER, EvalError, analyze, evaluate, evaluate_expression,
    evaluate_with_diagnostics, is_expression, resolve_code_value, resolve_text,
};
pub use functions::{FUNCTIONS, Function};
pub use parser::{ParseError, parse};
