//! Pretty diagnostic rendering using ariadne.
//!
//! Converts labelgen's [`Diagnostic`] type into ariadne [`Report`]s for
//! coloured, source-annotated terminal output. Falls back to structured JSON
//! when the output is piped or when the user explicitly requests it.
//!
//! Expression diagnostics carry spans into a template string rather than
//! into the design file, so the annotated source of each report is the
//! diagnostic's `template` context entry when present.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use labelgen_diagnostics::{Diagnostic, Severity};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// The explicit `--output` choice, or a guess based on whether stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            // Default: pretty for interactive terminals, JSON for pipes
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: &Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Warn => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        Severity::Info => Color::Blue,
        _ => Color::White,
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Render a slice of diagnostics in pretty (ariadne) format to stderr.
///
/// A diagnostic with a [`Span`](labelgen_diagnostics::Span) is rendered
/// against its `template` context entry, or against `source` when it has
/// none. Everything else is rendered as a standalone message.
pub(crate) fn render_diagnostics_pretty(
    source: Option<&str>,
    filename: &str,
    diagnostics: &[Diagnostic],
) {
    let config = Config::default().with_compact(false);

    for diag in diagnostics {
        let template = diag
            .context
            .as_ref()
            .and_then(|ctx| ctx.get("template"))
            .map(String::as_str)
            .or(source);

        if let (Some(span), Some(text)) = (&diag.span, template) {
            // Clamp span to source length to avoid panics on truncated input.
            let start = span.start.min(text.len());
            let end = span.end.min(text.len()).max(start);
            let name = report_name(filename, diag);
            let mut cache = (name.as_str(), Source::from(text));

            let mut builder =
                Report::build(report_kind(&diag.severity), (name.as_str(), start..end))
                    .with_code(diag.id.as_ref())
                    .with_message(&diag.message)
                    .with_config(config);

            builder = builder.with_label(
                Label::new((name.as_str(), start..end))
                    .with_message(make_label_message(diag))
                    .with_color(severity_color(&diag.severity)),
            );

            if let Some(explanation) = diag.explain() {
                builder = builder.with_help(explanation);
            }

            builder.finish().eprint(&mut cache).ok();
        } else {
            let kind_str = match diag.severity {
                Severity::Error => "error",
                Severity::Warn => "warning",
                Severity::Info => "info",
                _ => "diagnostic",
            };
            eprintln!("{kind_str}[{}]: {}", diag.id, diag.message);

            if let Some(note) = context_note(diag) {
                eprintln!("  = note: {note}");
            }

            if let Some(explanation) = diag.explain() {
                eprintln!("  = help: {explanation}");
            }
        }
    }
}

/// `design.json#element` when the diagnostic names an element.
fn report_name(filename: &str, diag: &Diagnostic) -> String {
    match diag.context.as_ref().and_then(|ctx| ctx.get("element")) {
        Some(element) => format!("{filename}#{element}"),
        None => filename.to_string(),
    }
}

/// Context entries other than the template text, as `k=v` pairs.
fn context_note(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref()?;
    let parts: Vec<String> = ctx
        .iter()
        .filter(|(k, _)| k.as_str() != "template")
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Build a concise label message from diagnostic context, avoiding duplication
/// with the report header message.
fn make_label_message(diag: &Diagnostic) -> String {
    // e.g. "element=vence, field=binding, function=SUMAR_DIAS"
    context_note(diag).unwrap_or_else(|| diag.message.clone())
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured summary line showing error/warning/info counts.
///
/// Example: `2 errors, 1 warning, 0 info`
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    use ariadne::Fmt;

    let (mut errors, mut warnings, mut infos) = (0usize, 0usize, 0usize);
    for d in diagnostics {
        match d.severity {
            Severity::Error => errors += 1,
            Severity::Warn => warnings += 1,
            Severity::Info => infos += 1,
            _ => warnings += 1,
        }
    }

    // Only print summary when there are diagnostics.
    if errors + warnings + infos == 0 {
        return;
    }

    let mut parts = Vec::new();
    if errors > 0 {
        let s = if errors == 1 { "" } else { "s" };
        parts.push(format!("{}", format!("{errors} error{s}").fg(Color::Red)));
    }
    if warnings > 0 {
        let s = if warnings == 1 { "" } else { "s" };
        parts.push(format!(
            "{}",
            format!("{warnings} warning{s}").fg(Color::Yellow)
        ));
    }
    if infos > 0 {
        parts.push(format!("{}", format!("{infos} info").fg(Color::Blue)));
    }
    eprintln!("{}", parts.join(", "));
}
