//! Stage vocabulary: the four sequential checkpoints of a matchmaking attempt
//! and the verdict recorded for each.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four checkpoints, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Registration,
    TableAssignment,
    SocketConnection,
    MatchmakingLifecycle,
}

impl Stage {
    /// All stages in evaluation order.
    pub const ALL: [Stage; 4] = [
        Stage::Registration,
        Stage::TableAssignment,
        Stage::SocketConnection,
        Stage::MatchmakingLifecycle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Registration => "REGISTRATION",
            Self::TableAssignment => "TABLE_ASSIGNMENT",
            Self::SocketConnection => "SOCKET_CONNECTION",
            Self::MatchmakingLifecycle => "MATCHMAKING_LIFECYCLE",
        }
    }

    /// Zero-based position in `Stage::ALL`.
    pub fn ordinal(&self) -> usize {
        match self {
            Self::Registration => 0,
            Self::TableAssignment => 1,
            Self::SocketConnection => 2,
            Self::MatchmakingLifecycle => 3,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Verdict of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageStatus {
    Success,
    Failed,
    /// Not evaluated (yet). Never the status of an evaluated stage.
    Unknown,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Failed => write!(f, "FAILED"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Which evidence decided a stage verdict.
///
/// `RequestMissing`, `ExplicitFailure`, `TimedOut` and `Unconfirmed` all map to
/// `StageStatus::Failed` but stay distinct so the classifier can pick the
/// finer-grained failure type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageOutcome {
    /// The success marker was found.
    Confirmed,
    /// The request/entry marker was never logged.
    RequestMissing,
    /// An explicit failure marker was found and no success marker.
    ExplicitFailure,
    /// A timeout marker was found and neither success nor explicit failure.
    TimedOut,
    /// The request was logged but no outcome marker followed.
    Unconfirmed,
}

impl StageOutcome {
    pub fn status(&self) -> StageStatus {
        match self {
            Self::Confirmed => StageStatus::Success,
            _ => StageStatus::Failed,
        }
    }
}

/// Output of one stage evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: Stage,
    pub status: StageStatus,
    /// `None` while the stage has not been evaluated.
    pub outcome: Option<StageOutcome>,
    /// Why the stage failed. Always set on FAILED.
    pub reason: Option<String>,
    /// Which markers were found or missing, counts and captured values.
    pub details: BTreeMap<String, serde_json::Value>,
}

impl StageResult {
    /// A stage that has not been evaluated.
    pub fn pending(stage: Stage) -> Self {
        Self {
            stage,
            status: StageStatus::Unknown,
            outcome: None,
            reason: None,
            details: BTreeMap::new(),
        }
    }

    /// A stage verdict decided by `outcome`. `reason` is ignored for `Confirmed`.
    pub fn evaluated(
        stage: Stage,
        outcome: StageOutcome,
        reason: impl Into<String>,
        details: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        let status = outcome.status();
        let reason = match status {
            StageStatus::Failed => Some(reason.into()),
            _ => None,
        };
        Self {
            stage,
            status,
            outcome: Some(outcome),
            reason,
            details,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StageStatus::Success
    }

    pub fn is_failed(&self) -> bool {
        self.status == StageStatus::Failed
    }
}
