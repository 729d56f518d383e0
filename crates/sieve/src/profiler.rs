//! Main Profiler struct and public API.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;

use crate::config::ExclusionPolicy;
use crate::detection::DetectionEngine;
use crate::error::{Result, SieveError};
use crate::inference::{ColumnInferencer, PatternRegistry};
use crate::input::{Parser, ParserConfig, SourceMetadata, Table};
use crate::report::{Report, ReportBuilder};

/// Configuration for a profiling pass.
#[derive(Debug, Clone, Default)]
pub struct ProfilerConfig {
    /// Which tables/columns skip the duplicate check.
    pub exclusion: ExclusionPolicy,
    /// Structural patterns, in tie-break order.
    pub patterns: PatternRegistry,
    /// Loader configuration for [`Profiler::profile_files`].
    pub parser: ParserConfig,
}

/// Result of profiling files from disk.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileRun {
    /// One entry per loaded file, in argument order.
    pub sources: Vec<SourceMetadata>,
    /// The profiling report.
    pub report: Report,
}

/// The profiling and anomaly-detection engine.
///
/// For every table, every column is sampled and inferred once, then run
/// through the detectors; findings are folded into one [`Report`].
pub struct Profiler {
    inferencer: ColumnInferencer,
    detection: DetectionEngine,
    parser: Parser,
}

impl Profiler {
    /// Create a profiler with default configuration.
    pub fn new() -> Self {
        Self::with_config(ProfilerConfig::default())
    }

    /// Create a profiler with custom configuration.
    pub fn with_config(config: ProfilerConfig) -> Self {
        let detection = DetectionEngine::new(config.patterns.clone(), config.exclusion);
        let inferencer = ColumnInferencer::with_patterns(config.patterns);
        let parser = Parser::with_config(config.parser);

        Self {
            inferencer,
            detection,
            parser,
        }
    }

    /// Profile a set of fully materialized tables.
    pub fn profile(&self, tables: &[Table]) -> Report {
        let mut builder = ReportBuilder::new();
        for table in tables {
            self.profile_into(&mut builder, table);
        }
        builder.finish()
    }

    /// Profile a single table.
    pub fn profile_table(&self, table: &Table) -> Report {
        self.profile(std::slice::from_ref(table))
    }

    /// Load every file, then profile them together.
    ///
    /// All files are loaded before any profiling starts, so a load failure
    /// never leaves a partial report behind. Tables are named after file
    /// stems; two files with the same stem are rejected.
    pub fn profile_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<ProfileRun> {
        let mut tables = Vec::with_capacity(paths.len());
        let mut sources = Vec::with_capacity(paths.len());
        let mut names = HashSet::new();

        for path in paths {
            let (table, source) = self.parser.parse_file(path)?;
            if !names.insert(table.name.clone()) {
                return Err(SieveError::Schema(format!(
                    "two inputs map to table '{}'",
                    table.name
                )));
            }
            tables.push(table);
            sources.push(source);
        }

        let report = self.profile(&tables);
        Ok(ProfileRun { sources, report })
    }

    fn profile_into(&self, builder: &mut ReportBuilder, table: &Table) {
        let _span = tracing::debug_span!("profile_table", table = %table.name).entered();

        let schema = self.inferencer.profile_table(table);
        for profile in &schema.columns {
            let detections = self.detection.detect_column(table, profile);
            builder.record_all(table, &profile.name, detections);
        }
        builder.add_table_schema(schema);

        tracing::debug!(
            table = %table.name,
            rows = table.row_count(),
            columns = table.column_count(),
            "profiled table"
        );
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}
