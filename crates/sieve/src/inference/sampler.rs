//! Deterministic column sampling.

use crate::input::Value;

/// Maximum number of values drawn for inference.
pub const SAMPLE_SIZE: usize = 20;

/// Seed used for every draw, so the same column always yields the same sample.
pub const SAMPLE_SEED: u64 = 42;

/// A bounded, reproducible sample of a column's present values, rendered to strings.
///
/// Samples feed type and pattern inference only. Detection always runs over
/// the full column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSample {
    values: Vec<String>,
}

impl ColumnSample {
    /// Draw with the default size and seed.
    pub fn draw<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        Self::draw_with(values, SAMPLE_SIZE, SAMPLE_SEED)
    }

    /// Draw up to `size` present values using a seeded partial Fisher-Yates shuffle.
    ///
    /// The chosen values keep their original column order.
    pub fn draw_with<'a>(
        values: impl IntoIterator<Item = &'a Value>,
        size: usize,
        seed: u64,
    ) -> Self {
        let present: Vec<&Value> = values.into_iter().filter(|v| !v.is_missing()).collect();

        if present.len() <= size {
            return Self {
                values: present.iter().map(|v| v.render()).collect(),
            };
        }

        let mut rng = fastrand::Rng::with_seed(seed);
        let mut indices: Vec<usize> = (0..present.len()).collect();
        for i in 0..size {
            let j = rng.usize(i..indices.len());
            indices.swap(i, j);
        }
        let mut chosen = indices[..size].to_vec();
        chosen.sort_unstable();

        Self {
            values: chosen.into_iter().map(|i| present[i].render()).collect(),
        }
    }

    /// Build a sample from already-rendered values.
    pub fn from_values(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Sampled values.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// An empty sample means inference is impossible for this column.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fraction of sampled values satisfying a predicate. Zero for an empty sample.
    pub fn rate(&self, predicate: impl Fn(&str) -> bool) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let hits = self.values.iter().filter(|v| predicate(v.as_str())).count();
        hits as f64 / self.values.len() as f64
    }

    /// True when the sample is non-empty and every value satisfies the predicate.
    pub fn all(&self, predicate: impl Fn(&str) -> bool) -> bool {
        !self.values.is_empty() && self.values.iter().all(|v| predicate(v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<Value> {
        (0..n).map(|i| Value::from(i as i64)).collect()
    }

    #[test]
    fn test_missing_values_dropped() {
        let values = vec![Value::Missing, Value::from("a"), Value::Missing, Value::from("b")];
        let sample = ColumnSample::draw(&values);
        assert_eq!(sample.values(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_all_missing_is_empty() {
        let values = vec![Value::Missing, Value::Missing];
        assert!(ColumnSample::draw(&values).is_empty());
    }

    #[test]
    fn test_sample_is_bounded() {
        let values = numbers(500);
        let sample = ColumnSample::draw(&values);
        assert_eq!(sample.len(), SAMPLE_SIZE);
    }

    #[test]
    fn test_sample_is_deterministic() {
        let values = numbers(200);
        let first = ColumnSample::draw(&values);
        let second = ColumnSample::draw(&values);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sample_preserves_column_order() {
        let values = numbers(100);
        let sample = ColumnSample::draw(&values);
        let parsed: Vec<i64> = sample.values().iter().map(|v| v.parse().unwrap()).collect();
        let mut sorted = parsed.clone();
        sorted.sort();
        assert_eq!(parsed, sorted);
    }

    #[test]
    fn test_rate() {
        let sample = ColumnSample::from_values(vec!["a".into(), "b".into(), "a".into(), "a".into()]);
        assert_eq!(sample.rate(|v| v == "a"), 0.75);
        assert_eq!(ColumnSample::from_values(vec![]).rate(|_| true), 0.0);
    }
}
