//! The failure classifier: runs the four stage evaluators in order and picks
//! the primary failure point.

use mmtrace_core::errors::check_session_id;
use mmtrace_core::types::failure::failure_for;
use mmtrace_core::{
    ClassifyError, EvaluationMode, FailurePoint, FailureType, MarkerTable, SessionAttempt, Stage, StageResult,
};
use serde_json::json;

use super::classification::{FailureClassification, FailurePoints, FailureRecord};
use crate::capacity::classify_capacity;
use crate::signals::SignalExtractor;
use crate::stages::evaluate_stage;

/// Classifies sessions against one compiled marker table.
///
/// Holds no mutable state, so one instance may be shared across threads.
#[derive(Debug, Clone)]
pub struct FailureClassifier {
    extractor: SignalExtractor,
}

impl FailureClassifier {
    pub fn new(markers: &MarkerTable) -> Result<Self, ClassifyError> {
        Ok(Self {
            extractor: SignalExtractor::new(markers)?,
        })
    }

    /// Classifier over the built-in marker table.
    pub fn with_defaults() -> Result<Self, ClassifyError> {
        Self::new(&MarkerTable::default())
    }

    pub fn extractor(&self) -> &SignalExtractor {
        &self.extractor
    }

    /// Classify one session from its raw log text.
    ///
    /// Missing markers yield FAILED stages, never errors. The only errors are
    /// contract violations on the session id.
    pub fn classify_session(
        &self,
        log_text: &str,
        session_id: &str,
        mode: EvaluationMode,
    ) -> Result<FailureClassification, ClassifyError> {
        check_session_id(session_id)?;
        Ok(self.classify_checked(log_text, session_id, mode, true))
    }

    /// Classify a session attempt. An attempt without log text is classified
    /// from the absence of every marker and flagged `log_available = false`.
    /// A participant count on the attempt adds a capacity verdict.
    pub fn classify_attempt(
        &self,
        attempt: &SessionAttempt,
        mode: EvaluationMode,
    ) -> Result<FailureRecord, ClassifyError> {
        check_session_id(&attempt.session_id)?;
        let (log_text, log_available) = match attempt.log_text.as_deref() {
            Some(text) => (text, true),
            None => ("", false),
        };
        let classification = self.classify_checked(log_text, &attempt.session_id, mode, log_available);
        let capacity = attempt
            .participant_count
            .map(|participants| classify_capacity(attempt.capacity, participants));
        Ok(FailureRecord {
            app_version: attempt.app_version,
            created_at: attempt.created_at.clone(),
            capacity,
            classification,
        })
    }

    fn classify_checked(
        &self,
        log_text: &str,
        session_id: &str,
        mode: EvaluationMode,
        log_available: bool,
    ) -> FailureClassification {
        let mut independent: Vec<StageResult> = Stage::ALL
            .iter()
            .map(|&stage| evaluate_stage(&self.extractor, stage, log_text, session_id))
            .collect();
        if !log_available {
            for result in &mut independent {
                result.details.insert("log_available".into(), json!(false));
            }
        }

        let all_failure_points: FailurePoints = independent
            .iter()
            .filter(|r| r.is_failed())
            .filter_map(|r| r.outcome.map(|o| failure_for(r.stage, o).0))
            .collect();

        let stages = match mode {
            EvaluationMode::Independent => independent,
            EvaluationMode::ShortCircuit => short_circuit(independent),
        };
        let primary = primary_failure(&stages);

        if all_failure_points.len() > 1 {
            tracing::debug!(
                session_id,
                points = ?all_failure_points.iter().map(|p| p.name()).collect::<Vec<_>>(),
                "multi-cause session"
            );
        }
        tracing::debug!(session_id, %mode, point = %primary.0, kind = %primary.1, "classified");

        FailureClassification::new(
            session_id.to_string(),
            mode,
            primary,
            all_failure_points,
            stages,
            log_available,
        )
    }
}

/// Keep results up to and including the first failure; later stages revert
/// to not evaluated, with a note of which stage stopped them.
fn short_circuit(independent: Vec<StageResult>) -> Vec<StageResult> {
    let mut stopped_by: Option<Stage> = None;
    independent
        .into_iter()
        .map(|result| match stopped_by {
            Some(blocker) => {
                let mut skipped = StageResult::pending(result.stage);
                skipped.details.insert("skipped_after".into(), json!(blocker.name()));
                skipped
            }
            None => {
                if result.is_failed() {
                    stopped_by = Some(result.stage);
                }
                result
            }
        })
        .collect()
}

/// A confirmed matchmaking lifecycle overrides earlier failures; otherwise the
/// first failed stage in chronological order wins.
fn primary_failure(stages: &[StageResult]) -> (FailurePoint, FailureType) {
    let lifecycle = &stages[Stage::MatchmakingLifecycle.ordinal()];
    if lifecycle.is_success() {
        return (FailurePoint::NoFailure, FailureType::Success);
    }
    stages
        .iter()
        .filter(|r| r.is_failed())
        .find_map(|r| r.outcome.map(|o| failure_for(r.stage, o)))
        .unwrap_or((FailurePoint::NoFailure, FailureType::Success))
}
