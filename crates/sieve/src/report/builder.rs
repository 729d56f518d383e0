//! Incremental construction of a [`Report`].

use std::collections::BTreeSet;

use indexmap::map::Entry;

use super::finding::{CellRef, Finding, FindingKey};
use super::Report;
use crate::detection::{Detection, Section};
use crate::input::Table;
use crate::schema::TableSchema;

/// Folds detections into a report.
///
/// Each recorded detection becomes one [`Finding`] in its section plus one
/// matching highlight entry. Recording the same key twice unions the rows
/// and cells.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    report: Report,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a table's schema.
    pub fn add_table_schema(&mut self, schema: TableSchema) {
        if self.report.tables.contains_key(&schema.name) {
            tracing::warn!(table = %schema.name, "table profiled twice; findings are merged");
        }
        self.report.tables.insert(schema.name.clone(), schema);
    }

    /// Record one detection for a column of `table`.
    pub fn record(&mut self, table: &Table, column: &str, detection: Detection) {
        let key = FindingKey::new(&table.name, column, detection.check);

        let mut rows: Vec<_> = table
            .rows
            .iter()
            .filter(|row| detection.rows.contains(&row.id))
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.id);

        let cells: BTreeSet<CellRef> = rows
            .iter()
            .map(|row| CellRef::new(row.id, column))
            .collect();

        tracing::debug!(key = %key, section = %key.section(), rows = rows.len(), "recorded finding");

        self.report
            .highlight
            .entry(key.clone())
            .or_default()
            .extend(cells.iter().cloned());

        let finding = Finding {
            key: key.clone(),
            rows,
            cells,
        };
        let section = match key.section() {
            Section::Missing => &mut self.report.missing,
            Section::Abnormal => &mut self.report.abnormal,
            Section::Duplicate => &mut self.report.duplicate,
        };
        match section.entry(key) {
            Entry::Occupied(mut existing) => existing.get_mut().merge(finding),
            Entry::Vacant(slot) => {
                slot.insert(finding);
            }
        }
    }

    /// Record every detection for a column.
    pub fn record_all(
        &mut self,
        table: &Table,
        column: &str,
        detections: impl IntoIterator<Item = Detection>,
    ) {
        for detection in detections {
            self.record(table, column, detection);
        }
    }

    /// Finish building.
    pub fn finish(self) -> Report {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Check;
    use crate::input::{RowId, Value};

    fn table() -> Table {
        Table::from_records(
            "t",
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec![Value::from(1i64), Value::Missing],
                vec![Value::from(2i64), "x".into()],
                vec![Value::from(3i64), Value::Missing],
            ],
        )
        .unwrap()
    }

    fn detection(check: Check, rows: &[usize]) -> Detection {
        Detection::from_rows(check, rows.iter().map(|&r| RowId(r)).collect()).unwrap()
    }

    #[test]
    fn test_record_builds_rows_and_cells() {
        let table = table();
        let mut builder = ReportBuilder::new();
        builder.record(&table, "b", detection(Check::Missing, &[2, 0]));
        let report = builder.finish();

        let key = FindingKey::new("t", "b", Check::Missing);
        let finding = report.get(&key).unwrap();
        assert_eq!(finding.rows.len(), 2);
        assert_eq!(finding.rows[0], table.rows[0]);
        assert_eq!(finding.rows[1], table.rows[2]);
        assert!(finding.cells.contains(&CellRef::new(RowId(0), "b")));
        assert_eq!(report.highlight_for(&key), Some(&finding.cells));
    }

    #[test]
    fn test_sections() {
        let table = table();
        let mut builder = ReportBuilder::new();
        builder.record(&table, "b", detection(Check::Missing, &[0]));
        builder.record(&table, "b", detection(Check::TooShort, &[1]));
        builder.record(&table, "b", detection(Check::Duplicate, &[0, 2]));
        let report = builder.finish();

        assert_eq!(report.missing().len(), 1);
        assert_eq!(report.abnormal().len(), 1);
        assert_eq!(report.duplicate().len(), 1);
        assert_eq!(report.highlight().len(), 3);
    }

    #[test]
    fn test_recording_twice_unions() {
        let table = table();
        let mut builder = ReportBuilder::new();
        builder.record(&table, "b", detection(Check::Missing, &[0]));
        builder.record(&table, "b", detection(Check::Missing, &[2]));
        let report = builder.finish();

        let key = FindingKey::new("t", "b", Check::Missing);
        assert_eq!(report.get(&key).unwrap().row_count(), 2);
        assert_eq!(report.highlight_for(&key).unwrap().len(), 2);
    }
}
