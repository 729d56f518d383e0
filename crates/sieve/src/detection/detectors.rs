//! Anomaly detectors, one per check.

use std::collections::{BTreeSet, HashMap};

use super::check::Check;
use super::stats::StreamingStats;
use crate::config::ExclusionPolicy;
use crate::inference::PatternRegistry;
use crate::input::{RowId, Table, Value, ValueDomain};
use crate::schema::ColumnProfile;

/// Flagged when further than this many standard deviations from the mean.
pub const OUTLIER_SIGMA: f64 = 5.0;

/// Present textual values shorter than this are flagged.
pub const MIN_TEXT_LENGTH: usize = 1;

/// Present textual values longer than this are flagged.
pub const MAX_TEXT_LENGTH: usize = 50;

/// Rows one check flagged in one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Which check fired.
    pub check: Check,
    /// Offending rows. Never empty.
    pub rows: BTreeSet<RowId>,
}

impl Detection {
    /// Wrap a row set, or `None` if nothing was flagged.
    pub fn from_rows(check: Check, rows: BTreeSet<RowId>) -> Option<Self> {
        (!rows.is_empty()).then_some(Self { check, rows })
    }
}

/// Trait for detectors.
pub trait Detector {
    /// Check one column and return what was flagged.
    fn detect(&self, table: &Table, profile: &ColumnProfile) -> Vec<Detection>;
}

/// Flags rows with no value.
pub struct MissingValueDetector;

impl Detector for MissingValueDetector {
    fn detect(&self, table: &Table, profile: &ColumnProfile) -> Vec<Detection> {
        let rows = table
            .column_values(profile.position)
            .filter(|(_, v)| v.is_missing())
            .map(|(id, _)| id)
            .collect();

        Detection::from_rows(Check::Missing, rows).into_iter().collect()
    }
}

/// Flags values that do not match the column's assigned structural pattern.
///
/// Missing values count as mismatches, so a missing cell in a
/// pattern-checked column shows up here and in the missing-value finding.
pub struct PatternMismatchDetector {
    patterns: PatternRegistry,
}

impl PatternMismatchDetector {
    pub fn new(patterns: PatternRegistry) -> Self {
        Self { patterns }
    }
}

impl Detector for PatternMismatchDetector {
    fn detect(&self, table: &Table, profile: &ColumnProfile) -> Vec<Detection> {
        let Some(assigned) = &profile.pattern else {
            return Vec::new();
        };
        let Some(pattern) = self.patterns.get(&assigned.name) else {
            tracing::warn!(pattern = %assigned.name, "assigned pattern is not registered");
            return Vec::new();
        };

        let rows = table
            .column_values(profile.position)
            .filter(|(_, v)| v.is_missing() || !pattern.full_match(&v.render()))
            .map(|(id, _)| id)
            .collect();

        Detection::from_rows(Check::Pattern, rows).into_iter().collect()
    }
}

/// Flags numeric values outside `mean ± 5σ`.
///
/// Runs only on numeric columns without a structural pattern. Constant
/// columns (σ = 0) and columns with fewer than two values never flag.
pub struct NumericOutlierDetector {
    sigma: f64,
}

impl Default for NumericOutlierDetector {
    fn default() -> Self {
        Self {
            sigma: OUTLIER_SIGMA,
        }
    }
}

impl NumericOutlierDetector {
    /// Bounds for a column, or `None` when the column cannot have outliers.
    pub fn bounds(&self, table: &Table, position: usize) -> Option<(f64, f64)> {
        let stats: StreamingStats = table
            .column_values(position)
            .filter_map(|(_, v)| v.as_number())
            .collect();

        let std = stats.std();
        if std.is_nan() || std <= 0.0 {
            return None;
        }

        let spread = self.sigma * std;
        Some((stats.mean() - spread, stats.mean() + spread))
    }
}

impl Detector for NumericOutlierDetector {
    fn detect(&self, table: &Table, profile: &ColumnProfile) -> Vec<Detection> {
        if profile.has_pattern() || profile.domain != ValueDomain::Numeric {
            return Vec::new();
        }

        let Some((lower, upper)) = self.bounds(table, profile.position) else {
            return Vec::new();
        };
        tracing::trace!(column = %profile.name, lower, upper, "outlier bounds");

        let rows = table
            .column_values(profile.position)
            .filter_map(|(id, v)| v.as_number().map(|n| (id, n)))
            .filter(|&(_, n)| n < lower || n > upper)
            .map(|(id, _)| id)
            .collect();

        Detection::from_rows(Check::Outlier, rows).into_iter().collect()
    }
}

/// Flags present textual values that are too short or too long.
///
/// Runs only on text or mixed columns without a structural pattern. Missing
/// values are never measured. Length is counted in characters.
pub struct StringLengthDetector {
    min_length: usize,
    max_length: usize,
}

impl Default for StringLengthDetector {
    fn default() -> Self {
        Self {
            min_length: MIN_TEXT_LENGTH,
            max_length: MAX_TEXT_LENGTH,
        }
    }
}

impl Detector for StringLengthDetector {
    fn detect(&self, table: &Table, profile: &ColumnProfile) -> Vec<Detection> {
        if profile.has_pattern()
            || !matches!(profile.domain, ValueDomain::Text | ValueDomain::Mixed)
        {
            return Vec::new();
        }

        let mut too_short = BTreeSet::new();
        let mut too_long = BTreeSet::new();

        for (id, value) in table.column_values(profile.position) {
            if value.is_missing() {
                continue;
            }
            let length = value.render().chars().count();
            if length < self.min_length {
                too_short.insert(id);
            }
            if length > self.max_length {
                too_long.insert(id);
            }
        }

        [
            Detection::from_rows(Check::TooShort, too_short),
            Detection::from_rows(Check::TooLong, too_long),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Hashable identity of a cell value for collision counting.
#[derive(Debug, PartialEq, Eq, Hash)]
enum ValueKey<'a> {
    Missing,
    Number(u64),
    Text(&'a str),
}

impl<'a> From<&'a Value> for ValueKey<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Missing => ValueKey::Missing,
            // -0.0 and 0.0 are the same value
            Value::Number(n) => ValueKey::Number(if *n == 0.0 { 0 } else { n.to_bits() }),
            Value::Text(s) => ValueKey::Text(s),
        }
    }
}

/// Flags every row whose value is shared with another row (keep-all).
///
/// Missing values collide with each other. Tables and columns named by the
/// exclusion policy are skipped.
pub struct DuplicateDetector {
    policy: ExclusionPolicy,
}

impl DuplicateDetector {
    pub fn new(policy: ExclusionPolicy) -> Self {
        Self { policy }
    }
}

impl Detector for DuplicateDetector {
    fn detect(&self, table: &Table, profile: &ColumnProfile) -> Vec<Detection> {
        if self.policy.excludes(&table.name, &profile.name) {
            tracing::trace!(table = %table.name, column = %profile.name, "duplicate check excluded");
            return Vec::new();
        }

        let mut groups: HashMap<ValueKey<'_>, Vec<RowId>> = HashMap::new();
        for (id, value) in table.column_values(profile.position) {
            groups.entry(ValueKey::from(value)).or_default().push(id);
        }

        let rows = groups
            .into_values()
            .filter(|ids| ids.len() > 1)
            .flatten()
            .collect();

        Detection::from_rows(Check::Duplicate, rows).into_iter().collect()
    }
}

/// Runs every detector over a column in aggregation order:
/// missing, then pattern/numeric/string, then duplicate.
pub struct DetectionEngine {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectionEngine {
    /// Create an engine with all default detectors.
    pub fn new(patterns: PatternRegistry, policy: ExclusionPolicy) -> Self {
        Self {
            detectors: vec![
                Box::new(MissingValueDetector),
                Box::new(PatternMismatchDetector::new(patterns)),
                Box::new(NumericOutlierDetector::default()),
                Box::new(StringLengthDetector::default()),
                Box::new(DuplicateDetector::new(policy)),
            ],
        }
    }

    /// Run all detectors over one column.
    pub fn detect_column(&self, table: &Table, profile: &ColumnProfile) -> Vec<Detection> {
        self.detectors
            .iter()
            .flat_map(|detector| detector.detect(table, profile))
            .collect()
    }
}

impl Default for DetectionEngine {
    fn default() -> Self {
        Self::new(PatternRegistry::default(), ExclusionPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ColumnInferencer;

    fn column(values: Vec<Value>) -> (Table, ColumnProfile) {
        column_named("t", values)
    }

    fn column_named(table: &str, values: Vec<Value>) -> (Table, ColumnProfile) {
        let table = Table::from_records(
            table,
            vec!["c".to_string()],
            values.into_iter().map(|v| vec![v]).collect(),
        )
        .unwrap();
        let profile = ColumnInferencer::new().profile_column(&table, 0);
        (table, profile)
    }

    fn ids(rows: &[usize]) -> BTreeSet<RowId> {
        rows.iter().map(|&r| RowId(r)).collect()
    }

    fn numbers(values: &[f64]) -> Vec<Value> {
        values.iter().map(|&n| Value::Number(n)).collect()
    }

    #[test]
    fn test_missing_detector() {
        let (table, profile) = column(vec!["a".into(), Value::Missing, "b".into(), Value::Missing]);
        let detections = MissingValueDetector.detect(&table, &profile);

        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].check, Check::Missing);
        assert_eq!(detections[0].rows, ids(&[1, 3]));
    }

    #[test]
    fn test_no_missing_no_detection() {
        let (table, profile) = column(vec!["a".into()]);
        assert!(MissingValueDetector.detect(&table, &profile).is_empty());
    }

    #[test]
    fn test_all_phones_no_mismatch() {
        let (table, profile) = column(vec![
            "13812345678".into(),
            "15912345678".into(),
            "18612345678".into(),
        ]);
        let detector = PatternMismatchDetector::new(PatternRegistry::default());

        assert_eq!(profile.pattern.as_ref().unwrap().rate, 1.0);
        assert!(detector.detect(&table, &profile).is_empty());
    }

    #[test]
    fn test_pattern_mismatch_includes_missing() {
        let mut values: Vec<Value> = (0..10).map(|i| Value::from(format!("u{}@x.com", i))).collect();
        values.push("invalid_email".into());
        values.push(Value::Missing);
        let (table, profile) = column(values);
        let detector = PatternMismatchDetector::new(PatternRegistry::default());

        let detections = detector.detect(&table, &profile);
        assert_eq!(detections[0].check, Check::Pattern);
        assert_eq!(detections[0].rows, ids(&[10, 11]));
    }

    #[test]
    fn test_pattern_detector_skips_unpatterned_columns() {
        let (table, profile) = column(vec!["x".into(), "y".into()]);
        let detector = PatternMismatchDetector::new(PatternRegistry::default());
        assert!(detector.detect(&table, &profile).is_empty());
    }

    #[test]
    fn test_constant_column_has_no_outliers() {
        let (table, profile) = column(numbers(&[4.0; 30]));
        assert!(NumericOutlierDetector::default().detect(&table, &profile).is_empty());
    }

    #[test]
    fn test_single_value_has_no_outliers() {
        let (table, profile) = column(numbers(&[4.0]));
        assert!(NumericOutlierDetector::default().detect(&table, &profile).is_empty());
    }

    #[test]
    fn test_extreme_value_is_outlier() {
        let mut values = vec![10.0; 40];
        values.push(10_000.0);
        let (table, profile) = column(numbers(&values));

        let detections = NumericOutlierDetector::default().detect(&table, &profile);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].rows, ids(&[40]));
    }

    #[test]
    fn test_outlier_bounds_are_exclusive() {
        let (table, profile) = column(numbers(&[0.0, 1.0, 2.0, 3.0, 4.0]));
        let detector = NumericOutlierDetector::default();
        let (lower, upper) = detector.bounds(&table, profile.position).unwrap();

        // mean 2, sample std sqrt(2.5)
        let spread = 5.0 * 2.5f64.sqrt();
        assert!((lower - (2.0 - spread)).abs() < 1e-12);
        assert!((upper - (2.0 + spread)).abs() < 1e-12);
        assert!(detector.detect(&table, &profile).is_empty());
    }

    #[test]
    fn test_outliers_skip_missing() {
        let mut values = numbers(&[10.0; 40]);
        values.push(Value::Missing);
        values.push(Value::Number(10_000.0));
        let (table, profile) = column(values);

        let detections = NumericOutlierDetector::default().detect(&table, &profile);
        assert_eq!(detections[0].rows, ids(&[41]));
    }

    #[test]
    fn test_outliers_skip_text_columns() {
        let (table, profile) = column(vec!["a".into(), "b".into()]);
        assert!(NumericOutlierDetector::default().detect(&table, &profile).is_empty());
    }

    #[test]
    fn test_string_lengths() {
        let long = "x".repeat(51);
        let (table, profile) = column(vec![
            "ok".into(),
            "".into(),
            long.as_str().into(),
            "y".repeat(50).into(),
            Value::Missing,
        ]);

        let detections = StringLengthDetector::default().detect(&table, &profile);
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].check, Check::TooShort);
        assert_eq!(detections[0].rows, ids(&[1]));
        assert_eq!(detections[1].check, Check::TooLong);
        assert_eq!(detections[1].rows, ids(&[2]));
    }

    #[test]
    fn test_string_length_counts_chars() {
        let (table, profile) = column(vec!["é".repeat(50).into(), "b".into()]);
        assert!(StringLengthDetector::default().detect(&table, &profile).is_empty());
    }

    #[test]
    fn test_string_length_skips_numeric_columns() {
        let (table, profile) = column(numbers(&[1.0, 2.0]));
        assert!(StringLengthDetector::default().detect(&table, &profile).is_empty());
    }

    #[test]
    fn test_duplicates_keep_all() {
        let (table, profile) = column(numbers(&[5.0, 5.0, 5.0, 7.0, 9.0]));
        let detections = DuplicateDetector::new(ExclusionPolicy::default()).detect(&table, &profile);

        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].rows, ids(&[0, 1, 2]));
    }

    #[test]
    fn test_duplicates_treat_signed_zero_as_equal() {
        let (table, profile) = column(numbers(&[0.0, -0.0, 1.0]));
        let detections = DuplicateDetector::new(ExclusionPolicy::default()).detect(&table, &profile);
        assert_eq!(detections[0].rows, ids(&[0, 1]));
    }

    #[test]
    fn test_duplicate_missing_values_collide() {
        let (table, profile) = column(vec![Value::Missing, "a".into(), Value::Missing]);
        let detections = DuplicateDetector::new(ExclusionPolicy::default()).detect(&table, &profile);
        assert_eq!(detections[0].rows, ids(&[0, 2]));
    }

    #[test]
    fn test_number_and_text_do_not_collide() {
        let (table, profile) = column(vec![Value::Number(5.0), "5".into()]);
        assert!(DuplicateDetector::new(ExclusionPolicy::default()).detect(&table, &profile).is_empty());
    }

    #[test]
    fn test_excluded_table_has_no_duplicates() {
        let (table, profile) = column_named("transactions", numbers(&[1.0, 1.0]));
        let detector = DuplicateDetector::new(ExclusionPolicy::new().skip_table("transactions"));
        assert!(detector.detect(&table, &profile).is_empty());
    }

    #[test]
    fn test_excluded_column_has_no_duplicates() {
        let (table, profile) = column_named("user_info", numbers(&[1.0, 1.0]));
        let detector = DuplicateDetector::new(ExclusionPolicy::new().skip_column("user_info", "c"));
        assert!(detector.detect(&table, &profile).is_empty());
    }

    #[test]
    fn test_engine_order() {
        let (table, profile) = column(vec!["".into(), "".into(), Value::Missing]);
        let checks: Vec<Check> = DetectionEngine::default()
            .detect_column(&table, &profile)
            .into_iter()
            .map(|d| d.check)
            .collect();
        assert_eq!(checks, vec![Check::Missing, Check::TooShort, Check::Duplicate]);
    }
}
