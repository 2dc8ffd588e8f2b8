use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One record of imported tabular data: column name → cell text.
///
/// Lookups try an exact match first and then fall back to a
/// case-insensitive match, so `{{Nombre}}` finds a `nombre` column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, serde_json::Value>")]
pub struct Row {
    columns: BTreeMap<String, String>,
}

impl Row {
    /// An empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column value, replacing any previous value under the same name.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.columns.insert(column.into(), value.into());
    }

    /// Look up a column by name, ignoring case.
    pub fn get(&self, column: &str) -> Option<&str> {
        if let Some(v) = self.columns.get(column) {
            return Some(v);
        }
        let wanted = column.to_lowercase();
        self.columns
            .iter()
            .find(|(k, _)| k.to_lowercase() == wanted)
            .map(|(_, v)| v.as_str())
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate columns in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for Row {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.columns.serialize(serializer)
    }
}

/// JSON rows come from spreadsheet exports, so numbers and booleans are
/// accepted and kept in their JSON spelling; `null` becomes an empty cell.
impl From<BTreeMap<String, serde_json::Value>> for Row {
    fn from(map: BTreeMap<String, serde_json::Value>) -> Self {
        let columns = map
            .into_iter()
            .map(|(k, v)| {
                let text = match v {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                (k, text)
            })
            .collect();
        Self { columns }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Per-label evaluation context shared by every element of one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalContext {
    /// Reference time for `HOY`, `LOTE` and empty `SUMAR_*` bases.
    pub now: NaiveDateTime,
    /// Zero-based position of the row within its batch.
    pub row_index: usize,
}

impl EvalContext {
    /// Context at `now`, first row.
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now, row_index: 0 }
    }

    /// Same reference time, different row.
    pub fn at_row(self, row_index: usize) -> Self {
        Self { row_index, ..self }
    }
}

impl Default for EvalContext {
    /// Local wall clock, first row.
    fn default() -> Self {
        Self::new(Local::now().naive_local())
    }
}
