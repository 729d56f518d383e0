//! Sieve: profiling and anomaly detection for tabular datasets.
//!
//! Sieve infers what each column of a table holds from a small reproducible
//! sample, runs type-appropriate checks over the full column, and collects
//! the results into a [`Report`] with exact cell coordinates for downstream
//! highlighting.
//!
//! # Checks
//!
//! - **Missing values**: any row without a value
//! - **Pattern mismatches**: values off a confidently matched structural
//!   pattern (email, phone, date)
//! - **Numeric outliers**: values beyond five standard deviations
//! - **String lengths**: empty or over-long text
//! - **Duplicates**: values shared by several rows, subject to an
//!   [`ExclusionPolicy`]
//!
//! # Example
//!
//! ```
//! use sieve::{Check, FindingKey, Profiler, Table, Value};
//!
//! let table = Table::from_records(
//!     "users",
//!     vec!["email".to_string()],
//!     vec![
//!         vec!["ann@example.com".into()],
//!         vec!["bob@example.com".into()],
//!         vec![Value::Missing],
//!     ],
//! )
//! .unwrap();
//!
//! let report = Profiler::new().profile_table(&table);
//! let missing = report.get(&FindingKey::new("users", "email", Check::Missing)).unwrap();
//! assert_eq!(missing.row_count(), 1);
//! ```

pub mod config;
pub mod detection;
pub mod error;
pub mod inference;
pub mod input;
pub mod report;
pub mod schema;

mod profiler;

pub use crate::profiler::{ProfileRun, Profiler, ProfilerConfig};
pub use config::ExclusionPolicy;
pub use detection::{Check, Section};
pub use error::{Result, SieveError};
pub use inference::PatternRegistry;
pub use input::{Row, RowId, SourceMetadata, Table, Value, ValueDomain};
pub use report::{CellRef, Finding, FindingKey, Report, ReportSummary};
pub use schema::{ColumnProfile, PatternMatch, SemanticType, TableSchema};
