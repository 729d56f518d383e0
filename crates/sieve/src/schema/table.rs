//! Table-level schema.

use serde::{Deserialize, Serialize};

use super::column::ColumnProfile;

/// Profiles for every column of one table, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Number of rows profiled.
    pub row_count: usize,
    /// Column profiles.
    pub columns: Vec<ColumnProfile>,
}

impl TableSchema {
    /// Create a schema with the given column profiles.
    pub fn new(name: impl Into<String>, row_count: usize, columns: Vec<ColumnProfile>) -> Self {
        Self {
            name: name.into(),
            row_count,
            columns,
        }
    }

    /// Column names, in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get a column profile by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }
}
