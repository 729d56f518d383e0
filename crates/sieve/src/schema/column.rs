//! Per-column profile produced by inference.

use serde::{Deserialize, Serialize};

use super::types::SemanticType;
use crate::input::ValueDomain;

/// A structural pattern confidently assigned to a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    /// Pattern name in the registry.
    pub name: String,
    /// Fraction of sampled values matching (always above the threshold).
    pub rate: f64,
}

/// What inference learned about one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Position in the table (0-indexed).
    pub position: usize,
    /// Guessed semantic type.
    pub semantic_type: SemanticType,
    /// Assigned structural pattern, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PatternMatch>,
    /// Runtime domain of the present values.
    pub domain: ValueDomain,
    /// Number of values in the inference sample.
    pub sample_size: usize,
    /// Number of present values.
    pub present_count: usize,
    /// Number of missing values.
    pub missing_count: usize,
}

impl ColumnProfile {
    /// Returns true if a structural pattern was assigned.
    pub fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }
}
