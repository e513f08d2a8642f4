//! Failure points, failure types, and evaluation policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::stage::{Stage, StageOutcome};

/// Where a matchmaking attempt broke down.
///
/// The first three mirror the early stages; the matchmaking lifecycle stage is
/// split further by which outcome marker decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailurePoint {
    Registration,
    TableAssignment,
    SocketConnection,
    QueueEntry,
    MatchmakingLogic,
    ServerUnresponsive,
    MatchmakingUnknown,
    NoFailure,
}

impl FailurePoint {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Registration => "REGISTRATION",
            Self::TableAssignment => "TABLE_ASSIGNMENT",
            Self::SocketConnection => "SOCKET_CONNECTION",
            Self::QueueEntry => "QUEUE_ENTRY",
            Self::MatchmakingLogic => "MATCHMAKING_LOGIC",
            Self::ServerUnresponsive => "SERVER_UNRESPONSIVE",
            Self::MatchmakingUnknown => "MATCHMAKING_UNKNOWN",
            Self::NoFailure => "NO_FAILURE",
        }
    }
}

impl fmt::Display for FailurePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Finer-grained cause attached to a failure point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureType {
    RegistrationFailure,
    AllocationFailure,
    NetworkFailure,
    QueueEntryFailure,
    ServerSideMatchmakingFailure,
    ClientSideTimeout,
    UnknownMatchmakingFailure,
    Success,
}

impl FailureType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegistrationFailure => "REGISTRATION_FAILURE",
            Self::AllocationFailure => "ALLOCATION_FAILURE",
            Self::NetworkFailure => "NETWORK_FAILURE",
            Self::QueueEntryFailure => "QUEUE_ENTRY_FAILURE",
            Self::ServerSideMatchmakingFailure => "SERVER_SIDE_MATCHMAKING_FAILURE",
            Self::ClientSideTimeout => "CLIENT_SIDE_TIMEOUT",
            Self::UnknownMatchmakingFailure => "UNKNOWN_MATCHMAKING_FAILURE",
            Self::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map a stage verdict to its (failure point, failure type) pair.
///
/// Every `Confirmed` outcome maps to `NO_FAILURE`/`SUCCESS`. Failed early stages
/// map to their own stage regardless of sub-reason; the lifecycle stage maps
/// each outcome to a distinct point.
pub fn failure_for(stage: Stage, outcome: StageOutcome) -> (FailurePoint, FailureType) {
    if outcome == StageOutcome::Confirmed {
        return (FailurePoint::NoFailure, FailureType::Success);
    }
    match stage {
        Stage::Registration => (FailurePoint::Registration, FailureType::RegistrationFailure),
        Stage::TableAssignment => (FailurePoint::TableAssignment, FailureType::AllocationFailure),
        Stage::SocketConnection => (FailurePoint::SocketConnection, FailureType::NetworkFailure),
        Stage::MatchmakingLifecycle => match outcome {
            StageOutcome::RequestMissing => (FailurePoint::QueueEntry, FailureType::QueueEntryFailure),
            StageOutcome::ExplicitFailure => (
                FailurePoint::MatchmakingLogic,
                FailureType::ServerSideMatchmakingFailure,
            ),
            StageOutcome::TimedOut => (FailurePoint::ServerUnresponsive, FailureType::ClientSideTimeout),
            _ => (
                FailurePoint::MatchmakingUnknown,
                FailureType::UnknownMatchmakingFailure,
            ),
        },
    }
}

/// How the classifier walks the four stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationMode {
    /// Every stage is evaluated regardless of earlier failures.
    #[default]
    Independent,
    /// Stage N+1 is only recorded when stage N succeeded.
    ShortCircuit,
}

impl EvaluationMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Independent => "independent",
            Self::ShortCircuit => "short-circuit",
        }
    }
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EvaluationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "independent" | "robust" => Ok(Self::Independent),
            "short-circuit" | "strict" => Ok(Self::ShortCircuit),
            other => Err(format!(
                "unknown evaluation mode '{other}' (expected 'independent' or 'short-circuit')"
            )),
        }
    }
}
