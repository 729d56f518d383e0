//! Schema types describing inferred table structure.

mod column;
mod table;
mod types;

pub use column::{ColumnProfile, PatternMatch};
pub use table::TableSchema;
pub use types::SemanticType;
