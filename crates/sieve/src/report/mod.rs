//! Profiling report: findings per section plus a unified highlight map.

mod builder;
mod finding;

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::detection::Section;
use crate::error::Result;
use crate::schema::TableSchema;

pub use builder::ReportBuilder;
pub use finding::{CellRef, Finding, FindingKey};

/// Aggregate of all findings from one profiling pass.
///
/// Every key in `missing`, `abnormal` and `duplicate` has exactly one entry
/// in `highlight` holding the same cells as the finding. Sections keep
/// insertion order: tables in input order, columns in table order, checks in
/// detection order.
///
/// A column's missing, outlier and duplicate keys share the label
/// `table.column`, so `highlight` serializes nested by section:
/// `{"missing": {label: cells}, "abnormal": {..}, "duplicate": {..}}`.
/// Labels are unique within a section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    tables: IndexMap<String, TableSchema>,
    missing: IndexMap<FindingKey, Finding>,
    abnormal: IndexMap<FindingKey, Finding>,
    duplicate: IndexMap<FindingKey, Finding>,
    #[serde(serialize_with = "serialize_highlight")]
    highlight: IndexMap<FindingKey, BTreeSet<CellRef>>,
}

fn serialize_highlight<S: Serializer>(
    highlight: &IndexMap<FindingKey, BTreeSet<CellRef>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(3))?;
    for section in [Section::Missing, Section::Abnormal, Section::Duplicate] {
        let entries: IndexMap<String, &BTreeSet<CellRef>> = highlight
            .iter()
            .filter(|(key, _)| key.section() == section)
            .map(|(key, cells)| (key.label(), cells))
            .collect();
        map.serialize_entry(section.label(), &entries)?;
    }
    map.end()
}

/// Counts over a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Number of tables profiled.
    pub tables: usize,
    /// Number of columns profiled.
    pub columns: usize,
    /// Findings in the missing section.
    pub missing_findings: usize,
    /// Findings in the abnormal section.
    pub abnormal_findings: usize,
    /// Findings in the duplicate section.
    pub duplicate_findings: usize,
    /// Distinct highlighted cells across all findings.
    pub highlighted_cells: usize,
    /// Tables with at least one finding.
    pub tables_with_findings: usize,
}

impl Report {
    /// Per-table schemas, in input order.
    pub fn tables(&self) -> &IndexMap<String, TableSchema> {
        &self.tables
    }

    pub fn missing(&self) -> &IndexMap<FindingKey, Finding> {
        &self.missing
    }

    pub fn abnormal(&self) -> &IndexMap<FindingKey, Finding> {
        &self.abnormal
    }

    pub fn duplicate(&self) -> &IndexMap<FindingKey, Finding> {
        &self.duplicate
    }

    /// Unified finding key to cell set map.
    pub fn highlight(&self) -> &IndexMap<FindingKey, BTreeSet<CellRef>> {
        &self.highlight
    }

    /// Findings of one section.
    pub fn section(&self, section: Section) -> &IndexMap<FindingKey, Finding> {
        match section {
            Section::Missing => &self.missing,
            Section::Abnormal => &self.abnormal,
            Section::Duplicate => &self.duplicate,
        }
    }

    /// Look up a finding by key.
    pub fn get(&self, key: &FindingKey) -> Option<&Finding> {
        self.section(key.section()).get(key)
    }

    /// Cells to highlight for a finding.
    pub fn highlight_for(&self, key: &FindingKey) -> Option<&BTreeSet<CellRef>> {
        self.highlight.get(key)
    }

    /// All findings, missing first, then abnormal, then duplicate.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.missing
            .values()
            .chain(self.abnormal.values())
            .chain(self.duplicate.values())
    }

    /// Findings for one table.
    pub fn findings_for_table<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings().filter(move |f| f.key.table == table)
    }

    /// True if nothing was flagged.
    pub fn is_clean(&self) -> bool {
        self.highlight.is_empty()
    }

    /// Compute summary counts.
    pub fn summary(&self) -> ReportSummary {
        let highlighted_cells = self
            .highlight
            .iter()
            .flat_map(|(key, cells)| cells.iter().map(move |c| (&key.table, c)))
            .collect::<BTreeSet<_>>()
            .len();
        let tables_with_findings = self
            .findings()
            .map(|f| f.key.table.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        ReportSummary {
            tables: self.tables.len(),
            columns: self.tables.values().map(|t| t.columns.len()).sum(),
            missing_findings: self.missing.len(),
            abnormal_findings: self.abnormal.len(),
            duplicate_findings: self.duplicate.len(),
            highlighted_cells,
            tables_with_findings,
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
