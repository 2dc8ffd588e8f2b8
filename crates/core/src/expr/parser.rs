//! Expression parser: turns the body of a `{{ … }}` span into an [`Expr`].
//!
//! The grammar is small enough that the parser works directly on string
//! slices: every split (`||`, comparison operators, `,`) only happens at
//! parenthesis depth zero and outside double-quoted strings. Separators are
//! ASCII, so scanning bytes never lands inside a multi-byte character.

use labelgen_diagnostics::Span;

use super::ast::{CompareOp, Expr};

/// A malformed expression body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
    /// Byte span within the template.
    pub span: Span,
}

/// Parse an expression body. `base` is the byte offset of `body` within the
/// template, so spans in the result point into the template.
pub fn parse(body: &str, base: usize) -> Result<Expr, ParseError> {
    check_balanced(body, base)?;
    Ok(parse_operand(body, base))
}

// ── Grammar ─────────────────────────────────────────────────────────────

/// operand := alternative ("||" alternative)*
fn parse_operand(s: &str, base: usize) -> Expr {
    let (text, base) = trim_with_offset(s, base);
    let parts = split_top_level(text, "||");
    if parts.len() > 1 {
        return Expr::Default {
            alternatives: parts
                .into_iter()
                .map(|(off, part)| parse_comparison(part, base + off))
                .collect(),
        };
    }
    parse_comparison(text, base)
}

/// alternative := term (OP term)?
fn parse_comparison(s: &str, base: usize) -> Expr {
    let (text, base) = trim_with_offset(s, base);
    if let Some((pos, symbol, op)) = find_compare(text) {
        let lhs = &text[..pos];
        let rhs = &text[pos + symbol.len()..];
        if !lhs.trim().is_empty() && !rhs.trim().is_empty() {
            return Expr::Compare {
                lhs: Box::new(parse_term(lhs, base)),
                op,
                rhs: Box::new(parse_term(rhs, base + pos + symbol.len())),
            };
        }
    }
    parse_term(text, base)
}

/// term := "\"" text "\"" | NAME "(" args ")" | word
fn parse_term(s: &str, base: usize) -> Expr {
    let (text, base) = trim_with_offset(s, base);
    if text.is_empty() {
        return Expr::literal("");
    }

    if let Some(inner) = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        && !inner.contains('"')
    {
        return Expr::literal(inner);
    }

    if let Some(call) = parse_call(text, base) {
        return call;
    }

    Expr::word(text)
}

fn parse_call(text: &str, base: usize) -> Option<Expr> {
    let open = text.find('(')?;
    let name = text[..open].trim_end();
    if !is_function_name(name) || matching_close(text, open)? != text.len() - 1 {
        return None;
    }

    let inner_start = open + 1;
    let inner = &text[inner_start..text.len() - 1];
    let args = if inner.trim().is_empty() {
        Vec::new()
    } else {
        split_top_level(inner, ",")
            .into_iter()
            .map(|(off, part)| parse_operand(part, base + inner_start + off))
            .collect()
    };

    Some(Expr::Call {
        name: name.to_string(),
        args,
        span: Span::new(base, base + text.len()),
    })
}

// ── Scanning helpers ────────────────────────────────────────────────────

fn is_function_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn trim_with_offset(s: &str, base: usize) -> (&str, usize) {
    let start = s.len() - s.trim_start().len();
    (s.trim(), base + start)
}

/// Split `s` on `sep` wherever it occurs outside quotes and parentheses.
/// Each part is returned with its byte offset in `s`.
fn split_top_level<'a>(s: &'a str, sep: &str) -> Vec<(usize, &'a str)> {
    let mut parts = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    let mut in_quote = false;

    while i < bytes.len() {
        let b = bytes[i];
        if in_quote {
            in_quote = b != b'"';
        } else if b == b'"' {
            in_quote = true;
        } else if b == b'(' {
            depth += 1;
        } else if b == b')' {
            depth -= 1;
        } else if depth == 0 && bytes[i..].starts_with(sep.as_bytes()) {
            parts.push((start, &s[start..i]));
            i += sep.len();
            start = i;
            continue;
        }
        i += 1;
    }
    parts.push((start, &s[start..]));
    parts
}

/// First top-level comparison operator in `s`.
fn find_compare(s: &str) -> Option<(usize, &'static str, CompareOp)> {
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    let mut in_quote = false;
    for i in 0..bytes.len() {
        let b = bytes[i];
        if in_quote {
            in_quote = b != b'"';
            continue;
        }
        match b {
            b'"' => in_quote = true,
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ if depth == 0 => {
                for (symbol, op) in CompareOp::ALL {
                    if bytes[i..].starts_with(symbol.as_bytes()) {
                        return Some((i, symbol, op));
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// Index of the `)` matching the `(` at `open`.
fn matching_close(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    let mut in_quote = false;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_quote {
            in_quote = b != b'"';
            continue;
        }
        match b {
            b'"' => in_quote = true,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn check_balanced(body: &str, base: usize) -> Result<(), ParseError> {
    let mut open_parens: Vec<usize> = Vec::new();
    let mut quote_start: Option<usize> = None;

    for (i, b) in body.bytes().enumerate() {
        if quote_start.is_some() {
            if b == b'"' {
                quote_start = None;
            }
            continue;
        }
        match b {
            b'"' => quote_start = Some(i),
            b'(' => open_parens.push(i),
            b')' => {
                if open_parens.pop().is_none() {
                    return Err(ParseError {
                        message: "unmatched ')'".into(),
                        span: Span::new(base + i, base + i + 1),
                    });
                }
            }
            _ => {}
        }
    }

    if let Some(start) = quote_start {
        return Err(ParseError {
            message: "unterminated string literal".into(),
            span: Span::new(base + start, base + body.len()),
        });
    }
    if let Some(&start) = open_parens.last() {
        return Err(ParseError {
            message: "unclosed '('".into(),
            span: Span::new(base + start, base + start + 1),
        });
    }
    Ok(())
}
