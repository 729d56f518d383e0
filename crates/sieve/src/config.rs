//! Exclusion policy for the duplicate check.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SieveError};

/// Tables and columns left out of duplicate detection.
///
/// Every other check runs over every column of every table regardless of
/// this policy.
///
/// ```
/// use sieve::ExclusionPolicy;
///
/// let policy = ExclusionPolicy::new()
///     .skip_table("transactions")
///     .skip_column("user_info", "region");
///
/// assert!(policy.excludes("transactions", "amount"));
/// assert!(policy.excludes("user_info", "region"));
/// assert!(!policy.excludes("user_info", "email"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionPolicy {
    /// Tables skipped entirely.
    pub skip_tables: BTreeSet<String>,
    /// Per-table columns skipped within otherwise-included tables.
    pub skip_columns: BTreeMap<String, BTreeSet<String>>,
}

impl ExclusionPolicy {
    /// An empty policy: every table and column is checked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip every column of a table.
    pub fn skip_table(mut self, table: impl Into<String>) -> Self {
        self.skip_tables.insert(table.into());
        self
    }

    /// Skip one column of a table.
    pub fn skip_column(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.skip_columns
            .entry(table.into())
            .or_default()
            .insert(column.into());
        self
    }

    /// True if the whole table is skipped.
    pub fn excludes_table(&self, table: &str) -> bool {
        self.skip_tables.contains(table)
    }

    /// True if duplicate detection must not run for this column.
    pub fn excludes(&self, table: &str, column: &str) -> bool {
        self.excludes_table(table)
            || self
                .skip_columns
                .get(table)
                .is_some_and(|columns| columns.contains(column))
    }

    /// Load a policy from a JSON file.
    ///
    /// ```json
    /// { "skip_tables": ["transactions"], "skip_columns": { "user_info": ["region"] } }
    /// ```
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| SieveError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse a policy from JSON text.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents)
            .map_err(|e| SieveError::Config(format!("invalid exclusion policy: {}", e)))
    }
}
