//! Batch-level summary of session classifications.

use mmtrace_core::{AnalysisConfig, EvaluationMode};
use serde::Serialize;

use super::crosstab::CrossTab;
use super::frequency::{percentage, Denominator, FrequencyRow, FrequencyTable};
use crate::classifier::FailureRecord;
use crate::recommendations::recommendations_for;

/// Version bucket label of an attempt.
pub fn version_bucket(app_version: Option<i64>, minimum_version: i64) -> String {
    match app_version {
        Some(v) if v >= minimum_version => format!(">= {minimum_version}"),
        Some(_) => format!("< {minimum_version}"),
        None => "unknown".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecommendation {
    pub recommendation: String,
    pub mentions: usize,
}

/// Counts and percentages over one classified batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub mode: EvaluationMode,
    pub total_sessions: usize,
    pub failed_sessions: usize,
    pub successful_sessions: usize,
    pub sessions_without_log: usize,
    pub multi_cause_sessions: usize,
    pub failure_rate: f64,
    /// Primary failure point against all sessions.
    pub failure_points: Vec<FrequencyRow>,
    /// Primary failure type against all sessions.
    pub failure_types: Vec<FrequencyRow>,
    /// Primary failure point of failed sessions against failed sessions only.
    pub failed_by_point: Vec<FrequencyRow>,
    /// Every detected failure point, counted once per session, against all sessions.
    pub all_failure_points: Vec<FrequencyRow>,
    pub version_buckets: Vec<FrequencyRow>,
    /// Version bucket × primary failure point.
    pub version_analysis: CrossTab,
    /// Sessions that carried a participant count, and so a capacity verdict.
    pub sessions_with_capacity: usize,
    /// Game size of those sessions, against sessions with a capacity verdict.
    pub game_sizes: Vec<FrequencyRow>,
    /// Capacity status of those sessions, against sessions with a capacity verdict.
    pub capacity_statuses: Vec<FrequencyRow>,
    pub top_recommendations: Vec<RankedRecommendation>,
}

impl SessionSummary {
    pub fn build(records: &[FailureRecord], mode: EvaluationMode, config: &AnalysisConfig) -> Self {
        let total = records.len();
        let mut points = FrequencyTable::new();
        let mut types = FrequencyTable::new();
        let mut failed_points = FrequencyTable::new();
        let mut all_points = FrequencyTable::new();
        let mut versions = FrequencyTable::new();
        let mut version_analysis = CrossTab::new();
        let mut recommendations = FrequencyTable::new();
        let mut game_sizes = FrequencyTable::new();
        let mut capacity_statuses = FrequencyTable::new();
        let mut without_log = 0;
        let mut multi_cause = 0;

        for record in records {
            let c = &record.classification;
            let point = c.failure_point().name();
            let bucket = version_bucket(record.app_version, config.minimum_version);

            points.add(point);
            types.add(c.failure_type().name());
            if c.is_failure() {
                failed_points.add(point);
            }
            for p in c.all_failure_points() {
                all_points.add(p.name());
            }
            versions.add(bucket.clone());
            version_analysis.add(bucket, point);
            if let Some(capacity) = &record.capacity {
                game_sizes.add(capacity.game_size.label());
                capacity_statuses.add(capacity.status.label());
            }
            for hint in recommendations_for(c) {
                recommendations.add(hint);
            }
            if !c.log_available() {
                without_log += 1;
            }
            if c.is_multi_cause() {
                multi_cause += 1;
            }
        }

        let failed = failed_points.total();
        Self {
            mode,
            total_sessions: total,
            failed_sessions: failed,
            successful_sessions: total - failed,
            sessions_without_log: without_log,
            multi_cause_sessions: multi_cause,
            failure_rate: percentage(failed, total),
            failure_points: points.rows(Denominator::Total),
            failure_types: types.rows(Denominator::Total),
            failed_by_point: failed_points.rows(Denominator::Total),
            all_failure_points: all_points.rows(Denominator::Fixed(total)),
            version_buckets: versions.rows(Denominator::Total),
            version_analysis,
            sessions_with_capacity: game_sizes.total(),
            game_sizes: game_sizes.rows(Denominator::Total),
            capacity_statuses: capacity_statuses.rows(Denominator::Total),
            top_recommendations: recommendations
                .top(config.top_n)
                .into_iter()
                .map(|(recommendation, mentions)| RankedRecommendation { recommendation, mentions })
                .collect(),
        }
    }
}
