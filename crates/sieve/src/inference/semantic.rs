//! Semantic type guessing as an ordered rule ladder.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::patterns::{PATTERN_CONFIDENCE, PatternRegistry};
use super::sampler::ColumnSample;
use crate::schema::SemanticType;

/// Formats tried one at a time; a format must parse every sampled value.
pub const STRICT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// Broader formats for the last date attempt; each value may use any of them.
const PERMISSIVE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y%m%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// The ladder's date rung only looks at the leading `YYYY-MM-DD`, so
/// datetime columns still rank as dates. Detection keeps the anchored form.
static DATE_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap());

type RulePredicate = Box<dyn Fn(&ColumnSample) -> bool + Send + Sync>;

/// One rung of the ladder: if the predicate holds for the sample, the column
/// gets `result`.
pub struct InferenceRule {
    name: String,
    result: SemanticType,
    predicate: RulePredicate,
}

impl InferenceRule {
    pub fn new(
        name: impl Into<String>,
        result: SemanticType,
        predicate: impl Fn(&ColumnSample) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            result,
            predicate: Box::new(predicate),
        }
    }

    /// Rule name, e.g. `pattern:email` or `date:%Y/%m/%d`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type assigned when the rule holds.
    pub fn result(&self) -> SemanticType {
        self.result
    }

    pub fn applies(&self, sample: &ColumnSample) -> bool {
        (self.predicate)(sample)
    }
}

impl fmt::Debug for InferenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceRule")
            .field("name", &self.name)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

/// Guesses a column's semantic type from its sample.
///
/// Rules are evaluated in order and the first that holds wins:
///
/// 1. each registry pattern with a semantic counterpart, rate above 0.8
///    (the date rung matches a leading `YYYY-MM-DD` rather than the whole value)
/// 2. every value numeric
/// 3. each strict date format, every value parsing under it
/// 4. every value parsing under some permissive date format
///
/// Anything left over is `string`; an empty sample is `unknown`.
#[derive(Debug)]
pub struct TypeInferencer {
    rules: Vec<InferenceRule>,
}

impl TypeInferencer {
    /// Create an inferencer over the default pattern registry.
    pub fn new() -> Self {
        Self::with_patterns(&PatternRegistry::default())
    }

    /// Create an inferencer whose pattern rungs come from `registry`.
    pub fn with_patterns(registry: &PatternRegistry) -> Self {
        let mut rules = Vec::new();

        for pattern in registry.iter() {
            let Some(result) = SemanticType::from_pattern_name(pattern.name()) else {
                continue;
            };
            let name = format!("pattern:{}", pattern.name());
            if result == SemanticType::Date {
                rules.push(InferenceRule::new(name, result, |sample| {
                    sample.rate(|v| DATE_PREFIX.is_match(v)) > PATTERN_CONFIDENCE
                }));
                continue;
            }
            let pattern = pattern.clone();
            rules.push(InferenceRule::new(name, result, move |sample| {
                sample.rate(|v| pattern.full_match(v)) > PATTERN_CONFIDENCE
            }));
        }

        rules.push(InferenceRule::new("numeric", SemanticType::Numeric, |sample| {
            sample.all(is_numeric)
        }));

        for &format in STRICT_DATE_FORMATS {
            rules.push(InferenceRule::new(
                format!("date:{}", format),
                SemanticType::Date,
                move |sample| sample.all(|v| parses_with_format(v, format)),
            ));
        }

        rules.push(InferenceRule::new(
            "date:permissive",
            SemanticType::Date,
            |sample| sample.all(parses_permissive),
        ));

        Self { rules }
    }

    /// The ladder, in evaluation order.
    pub fn rules(&self) -> &[InferenceRule] {
        &self.rules
    }

    /// Guess the semantic type of a sample.
    pub fn guess(&self, sample: &ColumnSample) -> SemanticType {
        if sample.is_empty() {
            return SemanticType::Unknown;
        }

        for rule in &self.rules {
            if rule.applies(sample) {
                tracing::trace!(rule = rule.name(), result = %rule.result(), "inference rule matched");
                return rule.result();
            }
        }

        SemanticType::String
    }
}

impl Default for TypeInferencer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_numeric(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}

fn parses_with_format(value: &str, format: &str) -> bool {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, format).is_ok()
        || NaiveDate::parse_from_str(value, format).is_ok()
}

fn parses_permissive(value: &str) -> bool {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value).is_ok()
        || DateTime::parse_from_rfc2822(value).is_ok()
        || STRICT_DATE_FORMATS
            .iter()
            .chain(PERMISSIVE_DATE_FORMATS)
            .any(|format| parses_with_format(value, format))
}
