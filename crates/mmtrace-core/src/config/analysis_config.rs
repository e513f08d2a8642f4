//! Analysis thresholds and batch settings.

use serde::{Deserialize, Serialize};

use crate::types::failure::EvaluationMode;

/// Upper bound of `merge_window_secs`: one day.
pub const MAX_MERGE_WINDOW_SECS: i64 = 86_400;

/// Configuration for classification batches and the reports built on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Only sessions at or above this app version are analysed; it also
    /// splits the version buckets.
    pub minimum_version: i64,
    /// Evaluation policy used when the caller does not pick one.
    pub default_mode: EvaluationMode,
    /// Value of the `reason` column that marks a failed matchmaking row.
    pub failure_reason: String,
    /// Upper bound (exclusive) of the fastest wait bucket, in seconds.
    pub quick_failure_secs: f64,
    /// Lower bound (inclusive) of the slow wait bucket, in seconds.
    pub slow_failure_secs: f64,
    /// Failure timestamps are rounded to this many seconds before grouping.
    /// At most [`MAX_MERGE_WINDOW_SECS`].
    pub merge_window_secs: i64,
    /// `created_by` value of players rejoining from a finished game. A
    /// simultaneous failure group is a missed merge only if one is present.
    pub cgp_origin: String,
    /// `created_by` value of fresh registrations.
    pub new_player_origin: String,
    /// Length of top-N rankings (users, recommendations).
    pub top_n: usize,
    /// Fishy share of failed games above which the system is critical.
    pub health_critical_pct: f64,
    /// Fishy share of failed games above which the system needs attention.
    pub health_moderate_pct: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            minimum_version: 448,
            default_mode: EvaluationMode::Independent,
            failure_reason: "matchmaking-failed".to_string(),
            quick_failure_secs: 2.0,
            slow_failure_secs: 5.0,
            merge_window_secs: 1,
            cgp_origin: "new-game-start".to_string(),
            new_player_origin: "rummy-registerations".to_string(),
            top_n: 10,
            health_critical_pct: 30.0,
            health_moderate_pct: 15.0,
        }
    }
}
