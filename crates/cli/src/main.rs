mod render;

use std::collections::BTreeMap;
use std::fs;
use std::process;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use labelgen_core::{
    Design, EvalContext, FieldEscape, GenerateOptions, Row, check_design,
    evaluate_with_diagnostics, generate_batch_at, generate_batch_par,
};
use labelgen_diagnostics::{self as diag, Diagnostic, Severity};
use labelgen_profile::{Profile, load_profile_from_str};
use serde::Serialize;

use crate::render::{Format, print_summary, render_diagnostics_pretty};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "labelgen",
    version,
    about = "Render label designs with data-driven templates to ZPL II, and check them for problems"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Render a design to ZPL, one label per data row.
    Render {
        /// Design JSON file.
        design: String,
        /// Data rows: a JSON array of objects, or a single object.
        /// Without rows one label is rendered from the design's static text.
        #[arg(long)]
        rows: Option<String>,
        /// Print resolution in dots per inch (overrides the profile).
        #[arg(long)]
        dpi: Option<u32>,
        /// Printer profile JSON; supplies the resolution.
        #[arg(long)]
        profile: Option<String>,
        /// Copies of each label.
        #[arg(long, default_value_t = 1)]
        copies: u32,
        /// Hex-escape `^` and `~` in field data instead of dropping them.
        #[arg(long)]
        hex_escape: bool,
        /// Reference time for dates and batch codes (RFC 3339,
        /// `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD`). Defaults to now.
        #[arg(long)]
        now: Option<String>,
        /// Render rows in parallel.
        #[arg(long)]
        parallel: bool,
    },

    /// Check a design for template errors and layout problems.
    Check {
        /// Design JSON file.
        design: String,
        /// Printer profile JSON to check page limits against.
        #[arg(long)]
        profile: Option<String>,
    },

    /// Evaluate a single template string against a data row.
    Eval {
        /// Template text, e.g. "{{MAYUS(nombre)}}".
        template: String,
        /// Data row: a JSON object.
        #[arg(long)]
        row: Option<String>,
        /// Zero-based row position, for CONTADOR and LOTE.
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// Reference time (see `render --help`).
        #[arg(long)]
        now: Option<String>,
    },

    /// Explain a diagnostic ID (e.g. LBL1001).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Render {
            design,
            rows,
            dpi,
            profile,
            copies,
            hex_escape,
            now,
            parallel,
        } => {
            let opts = RenderArgs {
                rows: rows.as_deref(),
                dpi,
                profile: profile.as_deref(),
                copies,
                hex_escape,
                now: now.as_deref(),
                parallel,
            };
            cmd_render(&design, &opts)?
        }
        Cmd::Check { design, profile } => cmd_check(&design, profile.as_deref(), format)?,
        Cmd::Eval {
            template,
            row,
            index,
            now,
        } => cmd_eval(&template, row.as_deref(), index, now.as_deref(), format)?,
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

// ── Commands ────────────────────────────────────────────────────────────

struct RenderArgs<'a> {
    rows: Option<&'a str>,
    dpi: Option<u32>,
    profile: Option<&'a str>,
    copies: u32,
    hex_escape: bool,
    now: Option<&'a str>,
    parallel: bool,
}

fn cmd_render(design_path: &str, args: &RenderArgs<'_>) -> Result<()> {
    let design = load_design(design_path)?;
    let rows = match args.rows {
        Some(path) => load_rows(path)?,
        None => vec![Row::new()],
    };

    let mut options = match args.profile {
        Some(path) => GenerateOptions::from_profile(&load_profile(path)?),
        None => GenerateOptions::default(),
    };
    if let Some(dpi) = args.dpi {
        options = options.dpi(dpi);
    }
    if args.hex_escape {
        options = options.escape(FieldEscape::Hex);
    }
    let options = options.copies(args.copies);
    let now = resolve_now(args.now)?;

    let zpl = if args.parallel {
        generate_batch_par(&design, &rows, now, &options)
    } else {
        generate_batch_at(&design, &rows, now, &options)
    };

    // ZPL is the expected output in both output modes.
    print!("{zpl}");
    Ok(())
}

fn cmd_check(design_path: &str, profile_path: Option<&str>, format: Format) -> Result<()> {
    let design = load_design(design_path)?;
    let profile = profile_path.map(load_profile).transpose()?;
    let result = check_design(&design, profile.as_ref());

    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Format::Pretty => {
            render_diagnostics_pretty(None, design_path, &result.issues);
            print_summary(&result.issues);
            if result.ok {
                eprintln!("check ok");
            }
        }
    }

    exit_on_errors(&result.issues);
    Ok(())
}

#[derive(Serialize)]
struct EvalOutput<'a> {
    value: &'a str,
    diagnostics: &'a [Diagnostic],
}

fn cmd_eval(
    template: &str,
    row_path: Option<&str>,
    index: usize,
    now: Option<&str>,
    format: Format,
) -> Result<()> {
    let row = match row_path {
        Some(path) => {
            let text = read(path)?;
            let map: BTreeMap<String, serde_json::Value> = serde_json::from_str(&text)
                .with_context(|| format!("'{path}' is not a JSON object"))?;
            Row::from(map)
        }
        None => Row::new(),
    };
    let ctx = EvalContext::new(resolve_now(now)?).at_row(index);
    let (value, diagnostics) = evaluate_with_diagnostics(template, &row, &ctx);

    match format {
        Format::Json => {
            let out = EvalOutput {
                value: &value,
                diagnostics: &diagnostics,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Value to stdout, diagnostics to stderr.
            println!("{value}");
            render_diagnostics_pretty(Some(template), "template", &diagnostics);
            print_summary(&diagnostics);
        }
    }

    // Evaluation never fails; a broken span is already `#ERR#` in the value.
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let text = diag::explain(id);
            let out = serde_json::json!({
                "id": id,
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Explanation is the expected output, so it goes to stdout.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{}: (no explanation available)", id);
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Exit with code 1 if any diagnostic is an error.
/// Warnings and info do not cause a non-zero exit.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics
        .iter()
        .any(|d| matches!(d.severity, Severity::Error))
    {
        process::exit(1);
    }
}

fn read(path: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read '{path}'"))
}

fn load_design(path: &str) -> Result<Design> {
    let text = read(path)?;
    Design::from_json(&text).with_context(|| format!("failed to load design '{path}'"))
}

fn load_profile(path: &str) -> Result<Profile> {
    let text = read(path)?;
    load_profile_from_str(&text).with_context(|| format!("failed to load profile '{path}'"))
}

/// Rows file: an array of objects, or one object for a single label.
fn load_rows(path: &str) -> Result<Vec<Row>> {
    let text = read(path)?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("invalid JSON in '{path}'"))?;
    parse_rows(value).with_context(|| format!("invalid rows in '{path}'"))
}

fn parse_rows(value: serde_json::Value) -> Result<Vec<Row>> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        object @ serde_json::Value::Object(_) => vec![object],
        other => bail!("expected an array of objects or an object, found {other}"),
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<BTreeMap<String, serde_json::Value>>(item)
                .map(Row::from)
                .with_context(|| format!("row {i} is not an object"))
        })
        .collect()
}

/// Parse `--now`, or read the local wall clock once.
fn resolve_now(now: Option<&str>) -> Result<NaiveDateTime> {
    let Some(text) = now else {
        return Ok(Local::now().naive_local());
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    bail!("invalid --now value '{text}': expected RFC 3339 or YYYY-MM-DD")
}
