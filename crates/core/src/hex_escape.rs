//! Field data sanitisation.
//!
//! `^` and `~` start commands in ZPL, so they must never reach a `^FD`
//! field verbatim. Two pure transforms are provided: [`strip_reserved`]
//! drops them, and [`encode_hex_escapes`] rewrites them as `_XX` hex
//! escapes for use after `^FH_`.

use std::borrow::Cow;

/// Default `^FH` escape indicator.
pub const INDICATOR: u8 = b'_';

/// Characters that would be read as command prefixes inside field data.
pub const RESERVED: [char; 2] = ['^', '~'];

/// Whether `value` contains `^` or `~`.
pub fn has_reserved(value: &str) -> bool {
    value.contains(RESERVED)
}

/// Remove every `^` and `~`. Borrows when there is nothing to remove.
pub fn strip_reserved(value: &str) -> Cow<'_, str> {
    if has_reserved(value) {
        Cow::Owned(value.replace(RESERVED, ""))
    } else {
        Cow::Borrowed(value)
    }
}

/// Rewrite `^`, `~` and the indicator `_` itself as `_5E`, `_7E`, `_5F`.
///
/// Only meaningful when the field is preceded by `^FH_`; everything else
/// is copied through unchanged.
pub fn encode_hex_escapes(value: &str) -> Cow<'_, str> {
    if !value.contains(['^', '~', INDICATOR as char]) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '^' => out.push_str("_5E"),
            '~' => out.push_str("_7E"),
            '_' => out.push_str("_5F"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}
