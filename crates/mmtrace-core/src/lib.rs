//! # mmtrace-core
//!
//! Foundation crate for the mmtrace matchmaking failure analyzer.
//! Defines the stage and failure vocabulary, session records, errors, config,
//! and tracing setup. Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{AnalysisConfig, MarkerSpec, MarkerTable, MmtraceConfig, StageMarkers};
pub use errors::error_code::MmtraceErrorCode;
pub use errors::{ClassifyError, ConfigError, IngestError};
pub use types::capacity::{CapacityStatus, GameSize};
pub use types::failure::{EvaluationMode, FailurePoint, FailureType};
pub use types::session::SessionAttempt;
pub use types::stage::{Stage, StageOutcome, StageResult, StageStatus};
