//! The single stage evaluator shared by all four stages.
//!
//! Verdict order, identical for every stage:
//! 1. no request marker: `RequestMissing`
//! 2. a success marker: `Confirmed`
//! 3. an explicit failure marker: `ExplicitFailure`
//! 4. a timeout marker: `TimedOut`
//! 5. otherwise: `Unconfirmed`
//!
//! Success beats explicit failure, and an authoritative server failure beats
//! a client-side timeout. Stages without an explicit-failure or timeout role
//! simply never produce those outcomes.

use std::collections::BTreeMap;

use mmtrace_core::{Stage, StageOutcome, StageResult};
use serde_json::{json, Value};

use super::reasons::ReasonTable;
use crate::signals::{SignalExtractor, SignalMatch, StageSignals};

/// Decide a stage verdict from extracted signals.
pub fn decide(signals: &StageSignals) -> StageOutcome {
    if signals.request.is_empty() {
        StageOutcome::RequestMissing
    } else if !signals.success.is_empty() {
        StageOutcome::Confirmed
    } else if present(&signals.explicit_failure) {
        StageOutcome::ExplicitFailure
    } else if present(&signals.timeout) {
        StageOutcome::TimedOut
    } else {
        StageOutcome::Unconfirmed
    }
}

fn present(role: &Option<Vec<SignalMatch>>) -> bool {
    role.as_ref().is_some_and(|m| !m.is_empty())
}

/// Evaluate one stage of one session.
///
/// Pure: the result depends only on the log text, the session id and the
/// compiled markers.
pub fn evaluate_stage(extractor: &SignalExtractor, stage: Stage, log_text: &str, session_id: &str) -> StageResult {
    let signals = extractor.extract(stage, log_text, session_id);
    let outcome = decide(&signals);

    let mut details: BTreeMap<String, Value> = BTreeMap::new();
    details.insert("request_found".into(), json!(!signals.request.is_empty()));
    details.insert("request_count".into(), json!(signals.request.len()));
    details.insert("confirmation_count".into(), json!(signals.success.len()));
    if let Some(first) = signals.request.first() {
        details.insert("request_line".into(), json!(first.line));
    }
    if let Some(m) = &signals.explicit_failure {
        details.insert("explicit_failure_found".into(), json!(!m.is_empty()));
    }
    if let Some(m) = &signals.timeout {
        details.insert("timeout_found".into(), json!(!m.is_empty()));
    }
    if outcome == StageOutcome::Confirmed {
        details.extend(extractor.captures(stage, log_text, session_id));
    }

    let reason = ReasonTable::for_stage(stage).reason(outcome);
    StageResult::evaluated(stage, outcome, reason, details)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit() -> Vec<SignalMatch> {
        vec![SignalMatch { start: 0, end: 1, line: 1 }]
    }

    #[test]
    fn missing_request_wins_over_everything() {
        let signals = StageSignals {
            request: vec![],
            success: hit(),
            explicit_failure: Some(hit()),
            timeout: Some(hit()),
        };
        assert_eq!(decide(&signals), StageOutcome::RequestMissing);
    }

    #[test]
    fn success_beats_explicit_failure() {
        let signals = StageSignals {
            request: hit(),
            success: hit(),
            explicit_failure: Some(hit()),
            timeout: None,
        };
        assert_eq!(decide(&signals), StageOutcome::Confirmed);
    }

    #[test]
    fn explicit_failure_beats_timeout() {
        let signals = StageSignals {
            request: hit(),
            success: vec![],
            explicit_failure: Some(hit()),
            timeout: Some(hit()),
        };
        assert_eq!(decide(&signals), StageOutcome::ExplicitFailure);
    }

    #[test]
    fn silence_after_request_is_unconfirmed() {
        let signals = StageSignals {
            request: hit(),
            success: vec![],
            explicit_failure: Some(vec![]),
            timeout: None,
        };
        assert_eq!(decide(&signals), StageOutcome::Unconfirmed);
    }

    #[test]
    fn every_failed_outcome_has_a_reason() {
        for stage in Stage::ALL {
            let table = ReasonTable::for_stage(stage);
            for outcome in [
                StageOutcome::RequestMissing,
                StageOutcome::ExplicitFailure,
                StageOutcome::TimedOut,
                StageOutcome::Unconfirmed,
            ] {
                assert!(!table.reason(outcome).is_empty(), "{stage} {outcome:?}");
            }
        }
    }
}
