use labelgen_diagnostics::Span;
use serde::Serialize;

/// A parsed expression body (the text between `{{` and `}}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Expr {
    /// An unquoted token: a column name, or literal text such as `-`, `4`
    /// or `AA-MM-DD` when used as an argument.
    Word {
        /// The token text, trimmed.
        text: String,
    },
    /// A quoted string; never looked up as a column.
    Literal {
        /// The text between the quotes.
        text: String,
    },
    /// A function call, `NAME(arg, …)`.
    Call {
        /// Function name, matched case-sensitively.
        name: String,
        /// Parsed arguments.
        args: Vec<Expr>,
        /// Byte span of the call within the template.
        span: Span,
    },
    /// A comparison `lhs OP rhs`, as used by `SI`.
    Compare {
        /// Left operand.
        lhs: Box<Expr>,
        /// Comparison operator.
        op: CompareOp,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// `a || b || …`: the first non-empty alternative.
    Default {
        /// Alternatives in order; always at least two.
        alternatives: Vec<Expr>,
    },
}

/// Comparison operators accepted inside `SI` conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOp {
    /// `==`, string equality.
    Eq,
    /// `!=`, string inequality.
    Ne,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
}

impl CompareOp {
    /// Operator spelling, longest first so `>=` wins over `>`.
    pub(crate) const ALL: [(&'static str, CompareOp); 6] = [
        ("==", CompareOp::Eq),
        ("!=", CompareOp::Ne),
        (">=", CompareOp::Ge),
        ("<=", CompareOp::Le),
        (">", CompareOp::Gt),
        ("<", CompareOp::Lt),
    ];

    /// The operator as written in a template.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
        }
    }
}

impl Expr {
    /// Shorthand for an unquoted token.
    pub fn word(text: impl Into<String>) -> Self {
        Expr::Word { text: text.into() }
    }

    /// Shorthand for a quoted literal.
    pub fn literal(text: impl Into<String>) -> Self {
        Expr::Literal { text: text.into() }
    }

    /// Visit every function call in this expression, outermost first.
    pub fn for_each_call<'a>(&'a self, f: &mut impl FnMut(&'a str, &'a [Expr], Span)) {
        match self {
            Expr::Word { .. } | Expr::Literal { .. } => {}
            Expr::Call { name, args, span } => {
                f(name, args, *span);
                for arg in args {
                    arg.for_each_call(f);
                }
            }
            Expr::Compare { lhs, rhs, .. } => {
                lhs.for_each_call(f);
                rhs.for_each_call(f);
            }
            Expr::Default { alternatives } => {
                for alt in alternatives {
                    alt.for_each_call(f);
                }
            }
        }
    }
}
