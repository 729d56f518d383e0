//! Per-column inference: one sample, one pattern decision, one semantic guess.

use super::patterns::PatternRegistry;
use super::sampler::ColumnSample;
use super::semantic::TypeInferencer;
use crate::input::{Table, ValueDomain};
use crate::schema::{ColumnProfile, TableSchema};

/// Builds [`ColumnProfile`]s for the columns of a table.
#[derive(Debug)]
pub struct ColumnInferencer {
    patterns: PatternRegistry,
    types: TypeInferencer,
}

impl ColumnInferencer {
    /// Create an inferencer with the default pattern registry.
    pub fn new() -> Self {
        Self::with_patterns(PatternRegistry::default())
    }

    /// Create an inferencer over a custom pattern registry.
    pub fn with_patterns(patterns: PatternRegistry) -> Self {
        let types = TypeInferencer::with_patterns(&patterns);
        Self { patterns, types }
    }

    /// The registry patterns are matched against.
    pub fn patterns(&self) -> &PatternRegistry {
        &self.patterns
    }

    /// Profile one column.
    pub fn profile_column(&self, table: &Table, index: usize) -> ColumnProfile {
        let name = table.columns[index].clone();
        let sample = ColumnSample::draw(table.column_values(index).map(|(_, v)| v));
        let missing_count = table
            .column_values(index)
            .filter(|(_, v)| v.is_missing())
            .count();

        let pattern = self.patterns.best_match(&sample);
        let semantic_type = self.types.guess(&sample);
        let domain = table.value_domain(index);

        if domain == ValueDomain::Mixed {
            tracing::warn!(
                table = %table.name,
                column = %name,
                "column mixes numeric and text values; treating as text"
            );
        }

        tracing::debug!(
            table = %table.name,
            column = %name,
            semantic_type = %semantic_type,
            pattern = pattern.as_ref().map(|p| p.name.as_str()),
            sample_size = sample.len(),
            "profiled column"
        );

        ColumnProfile {
            name,
            position: index,
            semantic_type,
            pattern,
            domain,
            sample_size: sample.len(),
            present_count: table.row_count() - missing_count,
            missing_count,
        }
    }

    /// Profile every column of a table.
    pub fn profile_table(&self, table: &Table) -> TableSchema {
        let columns = (0..table.column_count())
            .map(|i| self.profile_column(table, i))
            .collect();
        TableSchema::new(&table.name, table.row_count(), columns)
    }
}

impl Default for ColumnInferencer {
    fn default() -> Self {
        Self::new()
    }
}
