//! Anomaly detection over profiled columns.

mod check;
mod detectors;
mod stats;

pub use check::{Check, Section};
pub use detectors::{
    DetectionEngine, Detection, Detector, DuplicateDetector, MAX_TEXT_LENGTH, MIN_TEXT_LENGTH,
    MissingValueDetector, NumericOutlierDetector, OUTLIER_SIGMA, PatternMismatchDetector,
    StringLengthDetector,
};
pub use stats::StreamingStats;
