//! Named structural patterns and best-match selection.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::sampler::ColumnSample;
use crate::error::Result;
use crate::schema::PatternMatch;

/// A pattern is assigned only when its sampled match rate is strictly above this.
pub const PATTERN_CONFIDENCE: f64 = 0.8;

static DEFAULT_REGISTRY: Lazy<PatternRegistry> = Lazy::new(|| {
    let mut registry = PatternRegistry::empty();
    for (name, pattern) in [
        ("email", r"^[^@]+@[^@]+\.[^@]+$"),
        ("phone", r"^1[3-9]\d{9}$"),
        ("date", r"^\d{4}-\d{2}-\d{2}$"),
    ] {
        registry
            .register(name, pattern)
            .unwrap_or_else(|e| panic!("built-in pattern '{}' is invalid: {}", name, e));
    }
    registry
});

/// A compiled structural rule.
#[derive(Debug, Clone)]
pub struct StructuralPattern {
    name: String,
    source: String,
    regex: Regex,
}

impl StructuralPattern {
    /// Pattern name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The expression as registered.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True if the whole value matches.
    pub fn full_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// Ordered mapping of pattern name to compiled rule.
///
/// Enumeration order is tie-break priority: when two patterns reach the same
/// match rate, the earlier one wins.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: IndexMap<String, StructuralPattern>,
}

impl PatternRegistry {
    /// A registry with no patterns.
    pub fn empty() -> Self {
        Self {
            patterns: IndexMap::new(),
        }
    }

    /// Add a pattern, or replace an existing one in place keeping its priority.
    ///
    /// The expression is anchored at both ends regardless of how it is written.
    pub fn register(&mut self, name: impl Into<String>, pattern: &str) -> Result<()> {
        let name = name.into();
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        self.patterns.insert(
            name.clone(),
            StructuralPattern {
                name,
                source: pattern.to_string(),
                regex,
            },
        );
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_pattern(mut self, name: impl Into<String>, pattern: &str) -> Result<Self> {
        self.register(name, pattern)?;
        Ok(self)
    }

    /// Look up a pattern by name.
    pub fn get(&self, name: &str) -> Option<&StructuralPattern> {
        self.patterns.get(name)
    }

    /// Patterns in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &StructuralPattern> {
        self.patterns.values()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Pick the pattern with the highest match rate over a sample.
    ///
    /// Returns `None` for an empty sample or when the best rate does not
    /// exceed [`PATTERN_CONFIDENCE`].
    pub fn best_match(&self, sample: &ColumnSample) -> Option<PatternMatch> {
        if sample.is_empty() {
            return None;
        }

        let mut best: Option<(&StructuralPattern, f64)> = None;
        for pattern in self.iter() {
            let rate = sample.rate(|v| pattern.full_match(v));
            if rate > best.map_or(0.0, |(_, r)| r) {
                best = Some((pattern, rate));
            }
        }

        let (pattern, rate) = best?;
        tracing::trace!(pattern = pattern.name(), rate, "best pattern candidate");
        (rate > PATTERN_CONFIDENCE).then(|| PatternMatch {
            name: pattern.name().to_string(),
            rate,
        })
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        DEFAULT_REGISTRY.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(values: &[&str]) -> ColumnSample {
        ColumnSample::from_values(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_default_order() {
        let registry = PatternRegistry::default();
        let names: Vec<&str> = registry.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["email", "phone", "date"]);
    }

    #[test]
    fn test_full_match_is_anchored() {
        let registry = PatternRegistry::default();
        let date = registry.get("date").unwrap();
        assert!(date.full_match("2024-01-15"));
        assert!(!date.full_match("2024-01-15 10:00:00"));
        assert!(!date.full_match("x2024-01-15"));

        let custom = PatternRegistry::empty().with_pattern("code", r"[A-Z]{3}").unwrap();
        assert!(custom.get("code").unwrap().full_match("ABC"));
        assert!(!custom.get("code").unwrap().full_match("ABCD"));
    }

    #[test]
    fn test_all_phones_match() {
        let registry = PatternRegistry::default();
        let s = sample(&["13812345678", "15900001111", "18612345678"]);
        let m = registry.best_match(&s).unwrap();
        assert_eq!(m.name, "phone");
        assert_eq!(m.rate, 1.0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let registry = PatternRegistry::default();
        // 4 of 5 match: exactly 0.8 does not qualify
        let s = sample(&["a@b.co", "c@d.io", "e@f.org", "g@h.net", "nope"]);
        assert!(registry.best_match(&s).is_none());

        // 9 of 10 match
        let s = sample(&[
            "a@b.co", "c@d.io", "e@f.org", "g@h.net", "i@j.com", "k@l.com", "m@n.com", "o@p.com",
            "q@r.com", "bad",
        ]);
        let m = registry.best_match(&s).unwrap();
        assert_eq!(m.name, "email");
        assert!((m.rate - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_tie_break_prefers_earlier_pattern() {
        let registry = PatternRegistry::empty()
            .with_pattern("digits", r"\d+")
            .unwrap()
            .with_pattern("phone", r"1[3-9]\d{9}")
            .unwrap();
        let s = sample(&["13812345678", "15900001111"]);
        assert_eq!(registry.best_match(&s).unwrap().name, "digits");
    }

    #[test]
    fn test_replace_keeps_priority() {
        let mut registry = PatternRegistry::default();
        registry.register("email", r".+@.+").unwrap();
        let names: Vec<&str> = registry.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["email", "phone", "date"]);
        assert_eq!(registry.get("email").unwrap().source(), ".+@.+");
    }

    #[test]
    fn test_empty_sample_has_no_pattern() {
        assert!(PatternRegistry::default().best_match(&sample(&[])).is_none());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(PatternRegistry::empty().register("bad", "(").is_err());
    }
}
