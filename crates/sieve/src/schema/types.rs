//! Core type definitions for column profiles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inferred general shape of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// Email addresses.
    Email,
    /// Phone numbers.
    Phone,
    /// Dates or datetimes.
    Date,
    /// Numbers.
    Numeric,
    /// Anything else with values.
    String,
    /// No values to infer from.
    #[default]
    Unknown,
}

impl SemanticType {
    /// The semantic type a structural pattern name stands for, if any.
    pub fn from_pattern_name(name: &str) -> Option<Self> {
        match name {
            "email" => Some(SemanticType::Email),
            "phone" => Some(SemanticType::Phone),
            "date" => Some(SemanticType::Date),
            _ => None,
        }
    }

    /// Get a lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            SemanticType::Email => "email",
            SemanticType::Phone => "phone",
            SemanticType::Date => "date",
            SemanticType::Numeric => "numeric",
            SemanticType::String => "string",
            SemanticType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
