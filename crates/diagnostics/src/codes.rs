//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection.
//! `LBL1xxx` codes come from template expressions, `LBL2xxx` from the label
//! design itself.

/// Expression calls a function that is not in the function table.
pub const UNKNOWN_FUNCTION: &str = "LBL1001";

/// Function called with a number of arguments outside its accepted range.
pub const ARITY: &str = "LBL1002";

/// A function argument that must be numeric could not be parsed.
pub const INVALID_NUMBER: &str = "LBL1003";

/// A function argument that must be a date could not be parsed.
pub const INVALID_DATE: &str = "LBL1004";

/// Malformed expression body (unbalanced parentheses or quotes).
pub const EXPRESSION_SYNTAX: &str = "LBL1005";

/// `{{` opened without a matching `}}`.
pub const UNCLOSED_EXPRESSION: &str = "LBL1006";

/// `{{}}` with nothing inside.
pub const EMPTY_EXPRESSION: &str = "LBL1007";

/// Label width or height is zero, negative, or not a number.
pub const INVALID_DIMENSIONS: &str = "LBL2001";

/// Element extends past the edges of the label.
pub const ELEMENT_OUT_OF_BOUNDS: &str = "LBL2002";

/// Label width exceeds the printhead width of the profile.
pub const PAGE_WIDTH_EXCEEDED: &str = "LBL2003";

/// Label length exceeds the maximum label length of the profile.
pub const PAGE_LENGTH_EXCEEDED: &str = "LBL2004";

/// Barcode format is not recognised; Code 128 is used instead.
pub const UNKNOWN_BARCODE_FORMAT: &str = "LBL2005";

/// Element has neither a binding nor static text and will print empty.
pub const EMPTY_FIELD: &str = "LBL2006";

/// Every known code, in ID order.
pub const ALL: &[&str] = &[
    UNKNOWN_FUNCTION,
    ARITY,
    INVALID_NUMBER,
    INVALID_DATE,
    EXPRESSION_SYNTAX,
    UNCLOSED_EXPRESSION,
    EMPTY_EXPRESSION,
    INVALID_DIMENSIONS,
    ELEMENT_OUT_OF_BOUNDS,
    PAGE_WIDTH_EXCEEDED,
    PAGE_LENGTH_EXCEEDED,
    UNKNOWN_BARCODE_FORMAT,
    EMPTY_FIELD,
];
