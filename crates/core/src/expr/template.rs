//! Template splitter: separates literal text from `{{ … }}` expression spans.

use labelgen_diagnostics::Span;

/// Opening delimiter of an expression span.
pub const OPEN: &str = "{{";
/// Closing delimiter of an expression span.
pub const CLOSE: &str = "}}";

/// One piece of a template. Text borrows directly from the template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text copied to the output unchanged.
    Literal {
        /// The literal text.
        text: &'a str,
        /// Byte span of the text within the template.
        span: Span,
    },
    /// An expression between `{{` and `}}`.
    Expr {
        /// The text between the delimiters, untrimmed.
        body: &'a str,
        /// Byte offset of `body` within the template.
        body_start: usize,
        /// Byte span of the whole span, delimiters included.
        span: Span,
    },
    /// A `{{` that is never closed. Rendered as literal text.
    Unclosed {
        /// Text from the `{{` to the end of the template.
        text: &'a str,
        /// Byte span of that text.
        span: Span,
    },
}

/// Split a template into literal and expression segments, in order.
///
/// A template without `{{` yields a single `Literal` (or nothing when empty).
pub fn split(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut pos = 0usize;
    let mut literal_start = 0usize;

    while let Some(rel) = template[pos..].find(OPEN) {
        let open = pos + rel;
        let body_start = open + OPEN.len();
        let Some(close_rel) = find_close(&template[body_start..]) else {
            push_literal(&mut segments, template, literal_start, open);
            segments.push(Segment::Unclosed {
                text: &template[open..],
                span: Span::new(open, template.len()),
            });
            return segments;
        };
        let close = body_start + close_rel;
        push_literal(&mut segments, template, literal_start, open);
        segments.push(Segment::Expr {
            body: &template[body_start..close],
            body_start,
            span: Span::new(open, close + CLOSE.len()),
        });
        pos = close + CLOSE.len();
        literal_start = pos;
    }

    push_literal(&mut segments, template, literal_start, template.len());
    segments
}

/// Offset of the first `}}` outside a `"…"` literal. A body with an
/// unbalanced quote falls back to the first `}}` anywhere.
fn find_close(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut in_quote = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => in_quote = !in_quote,
            b'}' if !in_quote && bytes.get(i + 1) == Some(&b'}') => return Some(i),
            _ => {}
        }
        i += 1;
    }
    rest.find(CLOSE)
}

fn push_literal<'a>(out: &mut Vec<Segment<'a>>, template: &'a str, start: usize, end: usize) {
    if end > start {
        out.push(Segment::Literal {
            text: &template[start..end],
            span: Span::new(start, end),
        });
    }
}
