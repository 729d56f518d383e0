//! Finding keys, cell coordinates and findings.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::detection::{Check, Section};
use crate::input::{Row, RowId};

/// Identifies one finding: a check on one column of one table.
///
/// Renders as `table.column` plus the check's suffix, e.g.
/// `user_info.email_pattern` or `user_info.name_too_long`. The check is part
/// of the key, so a column's missing and duplicate findings stay distinct
/// even though both render as `table.column`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FindingKey {
    pub table: String,
    pub column: String,
    pub check: Check,
}

impl FindingKey {
    pub fn new(table: impl Into<String>, column: impl Into<String>, check: Check) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            check,
        }
    }

    /// Report section this key belongs to.
    pub fn section(&self) -> Section {
        self.check.section()
    }

    /// Rendered label.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.table, self.column, self.check.key_suffix())
    }
}

impl Serialize for FindingKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Exact cell coordinate to highlight.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CellRef {
    pub row: RowId,
    pub column: String,
}

impl CellRef {
    pub fn new(row: RowId, column: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
        }
    }
}

/// One detected anomaly category for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    /// What was checked where.
    pub key: FindingKey,
    /// Full offending rows, ordered by id.
    pub rows: Vec<Row>,
    /// Flagged cells. Every cell's row is in `rows`.
    pub cells: BTreeSet<CellRef>,
}

impl Finding {
    /// Number of offending rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Ids of the offending rows.
    pub fn row_ids(&self) -> BTreeSet<RowId> {
        self.rows.iter().map(|r| r.id).collect()
    }

    /// True if the given row was flagged.
    pub fn contains_row(&self, id: RowId) -> bool {
        self.rows.iter().any(|r| r.id == id)
    }

    /// Fold another finding for the same key into this one.
    pub(crate) fn merge(&mut self, other: Finding) {
        for row in other.rows {
            if !self.contains_row(row.id) {
                self.rows.push(row);
            }
        }
        self.rows.sort_by_key(|r| r.id);
        self.cells.extend(other.cells);
    }
}
