//! The expression function table.
//!
//! Every function receives its arguments already resolved to strings plus
//! the evaluation context, and returns a string. Arity is checked by the
//! caller against [`Function::accepts`] before the function runs, so the
//! implementations index `args` directly.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};

use super::ast::CompareOp;
use super::context::EvalContext;

/// Widest zero padding `CONTADOR`/`LOTE` will produce.
const MAX_PAD: usize = 64;
/// Most decimal places `REDONDEAR`/`FORMATO_NUM` will produce.
const MAX_DECIMALS: usize = 20;

/// Why a function rejected one of its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ArgError {
    /// Argument is not a number (or not an integer where one is required).
    NotANumber(String),
    /// Argument is not a recognised date.
    NotADate(String),
    /// Argument parsed but the result does not fit.
    OutOfRange(String),
}

/// An entry of the function table.
#[derive(Debug)]
pub struct Function {
    /// Name as written in templates (case-sensitive).
    pub name: &'static str,
    /// Fewest arguments accepted.
    pub min_args: usize,
    /// Most arguments accepted; `None` for variadic functions.
    pub max_args: Option<usize>,
    run: fn(&[String], &EvalContext) -> Result<String, ArgError>,
}

impl Function {
    /// Whether `count` arguments is a valid call.
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_args && self.max_args.is_none_or(|max| count <= max)
    }

    /// Human-readable arity, e.g. `"3"`, `"0 to 1"`, `"at least 1"`.
    pub fn arity(&self) -> String {
        match self.max_args {
            Some(max) if max == self.min_args => max.to_string(),
            Some(max) => format!("{} to {}", self.min_args, max),
            None => format!("at least {}", self.min_args),
        }
    }

    pub(crate) fn call(&self, args: &[String], ctx: &EvalContext) -> Result<String, ArgError> {
        (self.run)(args, ctx)
    }
}

const fn func(
    name: &'static str,
    min_args: usize,
    max_args: Option<usize>,
    run: fn(&[String], &EvalContext) -> Result<String, ArgError>,
) -> Function {
    Function {
        name,
        min_args,
        max_args,
        run,
    }
}

/// All functions available in templates.
pub static FUNCTIONS: &[Function] = &[
    func("MAYUS", 1, Some(1), mayus),
    func("MINUS", 1, Some(1), minus),
    func("RECORTAR", 2, Some(2), recortar),
    func("CONCAT", 1, None, concat),
    func("REEMPLAZAR", 3, Some(3), reemplazar),
    func("LARGO", 1, Some(1), largo),
    func("HOY", 0, Some(1), hoy),
    func("SUMAR_DIAS", 2, Some(2), sumar_dias),
    func("SUMAR_MESES", 2, Some(2), sumar_meses),
    func("CONTADOR", 3, Some(3), contador),
    func("LOTE", 1, Some(1), lote),
    func("REDONDEAR", 2, Some(2), redondear),
    func("FORMATO_NUM", 3, Some(3), formato_num),
    func("SI", 3, Some(3), si),
    func("VACIO", 0, Some(1), vacio),
    func("POR_DEFECTO", 2, Some(2), por_defecto),
];

/// Find a function by exact name.
pub fn lookup(name: &str) -> Option<&'static Function> {
    FUNCTIONS.iter().find(|f| f.name == name)
}

// ── Text ────────────────────────────────────────────────────────────────

fn mayus(args: &[String], _: &EvalContext) -> Result<String, ArgError> {
    Ok(args[0].to_uppercase())
}

fn minus(args: &[String], _: &EvalContext) -> Result<String, ArgError> {
    Ok(args[0].to_lowercase())
}

fn recortar(args: &[String], _: &EvalContext) -> Result<String, ArgError> {
    let n = parse_count(&args[1])?;
    Ok(args[0].chars().take(n).collect())
}

fn concat(args: &[String], _: &EvalContext) -> Result<String, ArgError> {
    Ok(args.concat())
}

fn reemplazar(args: &[String], _: &EvalContext) -> Result<String, ArgError> {
    if args[1].is_empty() {
        return Ok(args[0].clone());
    }
    Ok(args[0].replace(&args[1], &args[2]))
}

fn largo(args: &[String], _: &EvalContext) -> Result<String, ArgError> {
    Ok(args[0].chars().count().to_string())
}

// ── Dates ───────────────────────────────────────────────────────────────

fn hoy(args: &[String], ctx: &EvalContext) -> Result<String, ArgError> {
    let today = ctx.now.date();
    Ok(match args.first() {
        Some(fmt) if !fmt.is_empty() => format_date_tokens(fmt, today),
        _ => iso_date(today),
    })
}

fn sumar_dias(args: &[String], ctx: &EvalContext) -> Result<String, ArgError> {
    let base = base_date(&args[0], ctx)?;
    let n = parse_int(&args[1])?;
    let days = Days::new(n.unsigned_abs());
    let date = if n >= 0 {
        base.checked_add_days(days)
    } else {
        base.checked_sub_days(days)
    };
    date.map(iso_date)
        .ok_or_else(|| ArgError::OutOfRange(args[1].clone()))
}

/// Calendar months; the day is clamped to the end of the target month.
fn sumar_meses(args: &[String], ctx: &EvalContext) -> Result<String, ArgError> {
    let base = base_date(&args[0], ctx)?;
    let n = parse_int(&args[1])?;
    let months = u32::try_from(n.unsigned_abs())
        .map(Months::new)
        .map_err(|_| ArgError::OutOfRange(args[1].clone()))?;
    let date = if n >= 0 {
        base.checked_add_months(months)
    } else {
        base.checked_sub_months(months)
    };
    date.map(iso_date)
        .ok_or_else(|| ArgError::OutOfRange(args[1].clone()))
}

// ── Counters ────────────────────────────────────────────────────────────

fn contador(args: &[String], ctx: &EvalContext) -> Result<String, ArgError> {
    let start = parse_int(&args[0])?;
    let step = parse_int(&args[1])?;
    let pad = parse_pad(&args[2])?;
    counter(start, step, pad, ctx.row_index)
}

fn lote(args: &[String], ctx: &EvalContext) -> Result<String, ArgError> {
    let dated = format_date_tokens(&args[0], ctx.now.date());
    let sequence = |run: usize| {
        if run > MAX_PAD {
            return Err(ArgError::OutOfRange(args[0].clone()));
        }
        counter(1, 1, run, ctx.row_index)
    };
    let mut out = String::with_capacity(dated.len());
    let mut run = 0usize;
    for c in dated.chars() {
        if c == '#' {
            run += 1;
            continue;
        }
        if run > 0 {
            out.push_str(&sequence(run)?);
            run = 0;
        }
        out.push(c);
    }
    if run > 0 {
        out.push_str(&sequence(run)?);
    }
    Ok(out)
}

fn counter(start: i64, step: i64, pad: usize, row_index: usize) -> Result<String, ArgError> {
    let value = i64::try_from(row_index)
        .ok()
        .and_then(|i| step.checked_mul(i))
        .and_then(|offset| start.checked_add(offset))
        .ok_or_else(|| ArgError::OutOfRange(row_index.to_string()))?;
    Ok(format!("{value:0pad$}"))
}

// ── Numbers ─────────────────────────────────────────────────────────────

fn redondear(args: &[String], _: &EvalContext) -> Result<String, ArgError> {
    let n = parse_number(&args[0]).ok_or_else(|| ArgError::NotANumber(args[0].clone()))?;
    let decimals = parse_decimals(&args[1])?;
    Ok(format_fixed(n, decimals))
}

fn formato_num(args: &[String], _: &EvalContext) -> Result<String, ArgError> {
    let n = parse_number(&args[0]).ok_or_else(|| ArgError::NotANumber(args[0].clone()))?;
    let decimals = parse_decimals(&args[1])?;
    Ok(format_fixed(n, decimals).replace('.', &args[2]))
}

// ── Logic ───────────────────────────────────────────────────────────────

fn si(args: &[String], _: &EvalContext) -> Result<String, ArgError> {
    Ok(if truthy(&args[0]) {
        args[1].clone()
    } else {
        args[2].clone()
    })
}

fn vacio(args: &[String], _: &EvalContext) -> Result<String, ArgError> {
    let empty = args.first().is_none_or(|s| s.trim().is_empty());
    Ok(empty.to_string())
}

fn por_defecto(args: &[String], _: &EvalContext) -> Result<String, ArgError> {
    Ok(if args[0].is_empty() {
        args[1].clone()
    } else {
        args[0].clone()
    })
}

/// Condition truthiness for `SI`: empty, `false` and `0` are false.
pub(crate) fn truthy(s: &str) -> bool {
    let t = s.trim();
    !(t.is_empty() || t.eq_ignore_ascii_case("false") || t == "0")
}

/// `==`/`!=` compare text; ordering operators compare numerically when both
/// sides are numbers and fall back to text ordering otherwise.
pub(crate) fn compare(lhs: &str, op: CompareOp, rhs: &str) -> bool {
    let (l, r) = (lhs.trim(), rhs.trim());
    let ordering = match op {
        CompareOp::Eq => return l == r,
        CompareOp::Ne => return l != r,
        _ => match (parse_number(l), parse_number(r)) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => Some(l.cmp(r)),
        },
    };
    let Some(ordering) = ordering else {
        return false;
    };
    match op {
        CompareOp::Gt => ordering.is_gt(),
        CompareOp::Lt => ordering.is_lt(),
        CompareOp::Ge => ordering.is_ge(),
        CompareOp::Le => ordering.is_le(),
        CompareOp::Eq | CompareOp::Ne => unreachable!("handled above"),
    }
}

// ── Argument parsing ────────────────────────────────────────────────────

/// Parse a finite number, accepting `,` as decimal separator.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    let parsed = match t.parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) if t.matches(',').count() == 1 && !t.contains('.') => {
            t.replace(',', ".").parse::<f64>().ok()
        }
        Err(_) => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn parse_int(s: &str) -> Result<i64, ArgError> {
    let t = s.trim();
    if let Ok(v) = t.parse::<i64>() {
        return Ok(v);
    }
    match parse_number(t) {
        Some(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => Ok(v as i64),
        _ => Err(ArgError::NotANumber(s.to_string())),
    }
}

fn parse_count(s: &str) -> Result<usize, ArgError> {
    let n = parse_int(s)?;
    usize::try_from(n).map_err(|_| ArgError::OutOfRange(s.to_string()))
}

fn parse_pad(s: &str) -> Result<usize, ArgError> {
    let n = parse_count(s)?;
    if n > MAX_PAD {
        return Err(ArgError::OutOfRange(s.to_string()));
    }
    Ok(n)
}

fn parse_decimals(s: &str) -> Result<usize, ArgError> {
    let n = parse_count(s)?;
    if n > MAX_DECIMALS {
        return Err(ArgError::OutOfRange(s.to_string()));
    }
    Ok(n)
}

/// Round half away from zero and format with exactly `decimals` places.
///
/// Rounds the shortest decimal spelling of `value`, so `2.675` rounds like
/// the decimal it was typed as and large magnitudes keep every digit.
fn format_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let repr = value.abs().to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((&repr, ""));

    let mut digits: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();
    let int_len = digits.len();
    digits.extend(
        frac_part
            .bytes()
            .map(|b| b - b'0')
            .chain(std::iter::repeat(0))
            .take(decimals),
    );
    let round_up = frac_part
        .as_bytes()
        .get(decimals)
        .is_some_and(|d| *d >= b'5');

    let mut int_len = int_len;
    if round_up {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, 1);
                int_len += 1;
                break;
            }
            i -= 1;
            if digits[i] == 9 {
                digits[i] = 0;
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 && digits.iter().any(|d| *d != 0) {
        out.push('-');
    }
    for (i, d) in digits.iter().enumerate() {
        if i == int_len {
            out.push('.');
        }
        out.push(char::from(b'0' + d));
    }
    out
}

fn base_date(s: &str, ctx: &EvalContext) -> Result<NaiveDate, ArgError> {
    if s.trim().is_empty() {
        return Ok(ctx.now.date());
    }
    parse_date(s).ok_or_else(|| ArgError::NotADate(s.to_string()))
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD[T ]HH:MM:SS`, RFC 3339 and `DD/MM/YYYY`.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let t = s.trim();
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S"))
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(t)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| NaiveDate::parse_from_str(t, "%d/%m/%Y").ok())
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Substitute `AAAA`, `AA`, `MM`, `DD` in that order.
fn format_date_tokens(fmt: &str, date: NaiveDate) -> String {
    let year = date.year();
    fmt.replace("AAAA", &format!("{year:04}"))
        .replace("AA", &format!("{:02}", year.rem_euclid(100)))
        .replace("MM", &format!("{:02}", date.month()))
        .replace("DD", &format!("{:02}", date.day()))
}
