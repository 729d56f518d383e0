//! Error types for the Sieve library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sieve operations.
///
/// Profiling itself never fails; these errors come from building tables,
/// loading them from disk, and reading configuration.
#[derive(Debug, Error)]
pub enum SieveError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to profile.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Structurally invalid table input (duplicate columns, row ids, table names).
    #[error("Schema error: {0}")]
    Schema(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for Sieve operations.
pub type Result<T> = std::result::Result<T, SieveError>;
