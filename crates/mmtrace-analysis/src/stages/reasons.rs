//! Per-stage failure reason wording.

use mmtrace_core::{Stage, StageOutcome};

/// Reason strings for each failed outcome of one stage.
#[derive(Debug, Clone, Copy)]
pub struct ReasonTable {
    pub request_missing: &'static str,
    pub explicit_failure: &'static str,
    pub timed_out: &'static str,
    pub unconfirmed: &'static str,
}

const REGISTRATION: ReasonTable = ReasonTable {
    request_missing: "no registration request found",
    explicit_failure: "registration API failed or id not generated",
    timed_out: "registration API failed or id not generated",
    unconfirmed: "registration API failed or id not generated",
};

const TABLE_ASSIGNMENT: ReasonTable = ReasonTable {
    request_missing: "no table assignment request found",
    explicit_failure: "table assignment failed or status not assigned",
    timed_out: "table assignment failed or status not assigned",
    unconfirmed: "table assignment failed or status not assigned",
};

const SOCKET_CONNECTION: ReasonTable = ReasonTable {
    request_missing: "no socket connection attempt found",
    explicit_failure: "explicit connection failure",
    timed_out: "socket connection timed out",
    unconfirmed: "no confirmation found",
};

const MATCHMAKING_LIFECYCLE: ReasonTable = ReasonTable {
    request_missing: "session never entered the matchmaking queue",
    explicit_failure: "server reported matchmaking failed",
    timed_out: "client timer expired before a match was made",
    unconfirmed: "no matchmaking outcome found",
};

impl ReasonTable {
    pub fn for_stage(stage: Stage) -> &'static ReasonTable {
        match stage {
            Stage::Registration => &REGISTRATION,
            Stage::TableAssignment => &TABLE_ASSIGNMENT,
            Stage::SocketConnection => &SOCKET_CONNECTION,
            Stage::MatchmakingLifecycle => &MATCHMAKING_LIFECYCLE,
        }
    }

    /// Reason for a failed outcome; empty for `Confirmed`.
    pub fn reason(&self, outcome: StageOutcome) -> &'static str {
        match outcome {
            StageOutcome::Confirmed => "",
            StageOutcome::RequestMissing => self.request_missing,
            StageOutcome::ExplicitFailure => self.explicit_failure,
            StageOutcome::TimedOut => self.timed_out,
            StageOutcome::Unconfirmed => self.unconfirmed,
        }
    }
}
