//! Anomaly check identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Report section a finding lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Missing,
    Abnormal,
    Duplicate,
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Section::Missing => "missing",
            Section::Abnormal => "abnormal",
            Section::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One anomaly check. Variant order is aggregation order within a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Row has no value.
    Missing,
    /// Value does not match the column's structural pattern.
    Pattern,
    /// Numeric value beyond the sigma bounds.
    Outlier,
    /// Textual value shorter than the minimum length.
    TooShort,
    /// Textual value longer than the maximum length.
    TooLong,
    /// Value shared with at least one other row.
    Duplicate,
}

impl Check {
    /// Section of the report this check reports into.
    pub fn section(&self) -> Section {
        match self {
            Check::Missing => Section::Missing,
            Check::Pattern | Check::Outlier | Check::TooShort | Check::TooLong => Section::Abnormal,
            Check::Duplicate => Section::Duplicate,
        }
    }

    /// Suffix appended to `table.column` in a finding key label.
    pub fn key_suffix(&self) -> &'static str {
        match self {
            Check::Pattern => "_pattern",
            Check::TooShort => "_too_short",
            Check::TooLong => "_too_long",
            Check::Missing | Check::Outlier | Check::Duplicate => "",
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Check::Missing => "Missing Value",
            Check::Pattern => "Pattern Mismatch",
            Check::Outlier => "Numeric Outlier",
            Check::TooShort => "Too Short",
            Check::TooLong => "Too Long",
            Check::Duplicate => "Duplicate Value",
        }
    }
}
