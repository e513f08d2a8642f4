//! # mmtrace-analysis
//!
//! The classification engine. Raw log text and a session id flow through
//! signal extraction, four stage evaluators and the failure classifier;
//! per-game participant counts flow through the capacity classifier. The
//! aggregation layer turns both into frequency tables and reports.

pub mod aggregation;
pub mod capacity;
pub mod classifier;
pub mod games;
pub mod recommendations;
pub mod signals;
pub mod stages;

pub use capacity::{classify_capacity, CapacityClassification};
pub use classifier::{FailureClassification, FailureClassifier, FailureRecord};
pub use recommendations::recommendations_for;
