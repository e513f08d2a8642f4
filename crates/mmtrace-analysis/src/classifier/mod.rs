//! Failure classifier: stage orchestration, primary failure selection, batches.

pub mod batch;
pub mod classification;
pub mod engine;

pub use classification::{FailureClassification, FailurePoints, FailureRecord};
pub use engine::FailureClassifier;
