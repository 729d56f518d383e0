//! Tabular input: in-memory tables and the delimited-file loader.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{MISSING_SENTINEL, Row, RowId, SourceMetadata, Table, Value, ValueDomain};
