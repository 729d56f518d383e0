//! In-memory tables and source metadata.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SieveError};

/// Metadata about a file a table was loaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// A single scalar cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No value present.
    Missing,
    /// A numeric value.
    Number(f64),
    /// A textual value.
    Text(String),
}

static MISSING: Value = Value::Missing;

/// What a missing value renders to.
pub const MISSING_SENTINEL: &str = "None";

impl Value {
    /// Build a value from a raw delimited-text cell.
    ///
    /// Null tokens become `Missing`, finite numbers become `Number`, and
    /// everything else is kept verbatim as `Text`. Integers with a leading
    /// zero or more than 15 digits stay textual so they render unchanged.
    pub fn parse_cell(raw: &str) -> Self {
        if Table::is_null_token(raw) {
            return Value::Missing;
        }

        let trimmed = raw.trim();
        let digits = trimmed.trim_start_matches(['-', '+']);
        let integral = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
        if integral && ((digits.len() > 1 && digits.starts_with('0')) || digits.len() > 15) {
            return Value::Text(raw.to_string());
        }

        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(raw.to_string()),
        }
    }

    /// Returns true if no value is present.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric content, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Stringified form used by pattern and length checks.
    pub fn render(&self) -> String {
        match self {
            Value::Missing => MISSING_SENTINEL.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

/// Integral values print without a fractional part.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Stable identity of a row, independent of its position in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub usize);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row, with values aligned to the table's column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub values: Vec<Value>,
}

impl Row {
    /// Create a row.
    pub fn new(id: RowId, values: Vec<Value>) -> Self {
        Self { id, values }
    }

    /// Value at a column position. Absent trailing cells read as missing.
    pub fn get(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&MISSING)
    }
}

/// Runtime value domain of a column, derived from its present values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueDomain {
    /// Every present value is numeric.
    Numeric,
    /// Every present value is textual.
    Text,
    /// Both numeric and textual values are present.
    Mixed,
    /// No values present.
    Unset,
}

/// A named table of rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Column names, in order.
    pub columns: Vec<String>,
    /// Rows, each carrying its own id.
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a table, rejecting duplicate column names and row ids.
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let name = name.into();

        let mut seen_columns = HashSet::new();
        for column in &columns {
            if !seen_columns.insert(column.as_str()) {
                return Err(SieveError::Schema(format!(
                    "table '{}' has duplicate column '{}'",
                    name, column
                )));
            }
        }

        let mut seen_ids = HashSet::new();
        for row in &rows {
            if !seen_ids.insert(row.id) {
                return Err(SieveError::Schema(format!(
                    "table '{}' has duplicate row id {}",
                    name, row.id
                )));
            }
        }

        Ok(Self { name, columns, rows })
    }

    /// Create a table from positional records, assigning ids `0..n`.
    pub fn from_records(
        name: impl Into<String>,
        columns: Vec<String>,
        records: Vec<Vec<Value>>,
    ) -> Result<Self> {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, values)| Row::new(RowId(i), values))
            .collect();
        Self::new(name, columns, rows)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of a column, with the id of the row they belong to.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = (RowId, &Value)> {
        self.rows.iter().map(move |row| (row.id, row.get(index)))
    }

    /// Look up a row by id.
    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Runtime domain of a column.
    pub fn value_domain(&self, index: usize) -> ValueDomain {
        let mut numeric = false;
        let mut text = false;
        for (_, value) in self.column_values(index) {
            match value {
                Value::Number(_) => numeric = true,
                Value::Text(_) => text = true,
                Value::Missing => {}
            }
        }

        match (numeric, text) {
            (true, false) => ValueDomain::Numeric,
            (false, true) => ValueDomain::Text,
            (true, true) => ValueDomain::Mixed,
            (false, false) => ValueDomain::Unset,
        }
    }

    /// Check if a raw cell represents a missing/null value.
    pub fn is_null_token(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed == "."
            || trimmed == "-"
    }
}
