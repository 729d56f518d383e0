//! Inference engine: sampling, structural patterns and semantic types.

mod column;
mod patterns;
mod sampler;
mod semantic;

pub use column::ColumnInferencer;
pub use patterns::{PATTERN_CONFIDENCE, PatternRegistry, StructuralPattern};
pub use sampler::{ColumnSample, SAMPLE_SEED, SAMPLE_SIZE};
pub use semantic::{InferenceRule, STRICT_DATE_FORMATS, TypeInferencer};
