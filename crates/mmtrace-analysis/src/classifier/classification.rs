//! Classifier output records.

use mmtrace_core::{EvaluationMode, FailurePoint, FailureType, Stage, StageResult};
use serde::Serialize;
use smallvec::SmallVec;

use crate::capacity::CapacityClassification;

/// Failure points detected in one session, in chronological order.
pub type FailurePoints = SmallVec<[FailurePoint; 4]>;

/// The verdict for one session attempt.
///
/// Fields are private: the primary point and type are set only by
/// [`FailureClassifier`](super::FailureClassifier), never by an evaluator or a caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureClassification {
    session_id: String,
    mode: EvaluationMode,
    failure_point: FailurePoint,
    failure_type: FailureType,
    all_failure_points: FailurePoints,
    stages: Vec<StageResult>,
    log_available: bool,
}

impl FailureClassification {
    pub(crate) fn new(
        session_id: String,
        mode: EvaluationMode,
        (failure_point, failure_type): (FailurePoint, FailureType),
        all_failure_points: FailurePoints,
        stages: Vec<StageResult>,
        log_available: bool,
    ) -> Self {
        Self {
            session_id,
            mode,
            failure_point,
            failure_type,
            all_failure_points,
            stages,
            log_available,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Primary failure point: the first failed stage, or `NO_FAILURE`.
    pub fn failure_point(&self) -> FailurePoint {
        self.failure_point
    }

    pub fn failure_type(&self) -> FailureType {
        self.failure_type
    }

    /// Every failed stage from an independent evaluation, whatever the mode.
    pub fn all_failure_points(&self) -> &[FailurePoint] {
        &self.all_failure_points
    }

    /// One result per stage, in `Stage::ALL` order.
    pub fn stages(&self) -> &[StageResult] {
        &self.stages
    }

    pub fn stage(&self, stage: Stage) -> &StageResult {
        &self.stages[stage.ordinal()]
    }

    pub fn is_failure(&self) -> bool {
        self.failure_point != FailurePoint::NoFailure
    }

    /// More than one stage failed.
    pub fn is_multi_cause(&self) -> bool {
        self.all_failure_points.len() > 1
    }

    /// Whether any log text was supplied for the session.
    pub fn log_available(&self) -> bool {
        self.log_available
    }

    /// A captured detail of a stage, such as the pod ip of the table assignment.
    pub fn detail(&self, stage: Stage, key: &str) -> Option<&serde_json::Value> {
        self.stage(stage).details.get(key)
    }
}

/// A classification joined with the attempt metadata aggregation needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    pub app_version: Option<i64>,
    pub created_at: Option<String>,
    /// Capacity verdict of the target game, when the attempt carries a
    /// participant count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<CapacityClassification>,
    #[serde(flatten)]
    pub classification: FailureClassification,
}
