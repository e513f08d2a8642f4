//! Aggregator: frequency tables, cross-tabs, summaries and health verdicts.

pub mod crosstab;
pub mod frequency;
pub mod health;
pub mod session_summary;

pub use crosstab::CrossTab;
pub use frequency::{percentage, Denominator, FrequencyRow, FrequencyTable};
pub use health::HealthVerdict;
pub use session_summary::{version_bucket, RankedRecommendation, SessionSummary};
