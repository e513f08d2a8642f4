//! Failure classifier scenarios over logs in the client's wording.

mod common;

use common::*;
use mmtrace_analysis::{recommendations_for, FailureClassifier};
use mmtrace_core::{
    EvaluationMode, FailurePoint, FailureType, MarkerTable, MmtraceErrorCode, Stage, StageStatus,
};
use serde_json::json;

fn classifier() -> FailureClassifier {
    FailureClassifier::with_defaults().unwrap()
}

// ─── Full sessions ─────────────────────────────────────────────────────────

#[test]
fn full_session_is_no_failure() {
    let result = classifier()
        .classify_session(&full_success("R1"), "R1", EvaluationMode::Independent)
        .unwrap();
    assert_eq!(result.failure_point(), FailurePoint::NoFailure);
    assert_eq!(result.failure_type(), FailureType::Success);
    assert!(result.all_failure_points().is_empty());
    assert!(result.stages().iter().all(|s| s.status == StageStatus::Success));
    assert_eq!(result.detail(Stage::TableAssignment, "game_id"), Some(&json!("G-77")));
    assert_eq!(result.detail(Stage::TableAssignment, "pod_ip"), Some(&json!("10.2.3.4")));
    assert!(recommendations_for(&result).is_empty());
}

#[test]
fn other_sessions_in_the_same_log_do_not_count() {
    let log = format!("{}{}", full_success("OTHER"), registration("R1"));
    let result = classifier()
        .classify_session(&log, "R1", EvaluationMode::Independent)
        .unwrap();
    assert_eq!(result.failure_point(), FailurePoint::TableAssignment);
}

// ─── Stage by stage ────────────────────────────────────────────────────────

#[test]
fn registration_only_fails_at_table_assignment() {
    let result = classifier()
        .classify_session(&registration("R1"), "R1", EvaluationMode::Independent)
        .unwrap();
    assert_eq!(result.failure_point(), FailurePoint::TableAssignment);
    assert_eq!(result.failure_type(), FailureType::AllocationFailure);
    assert_eq!(result.stage(Stage::SocketConnection).status, StageStatus::Failed);
    assert_eq!(result.stage(Stage::MatchmakingLifecycle).status, StageStatus::Failed);
    assert_eq!(
        result.all_failure_points(),
        &[FailurePoint::TableAssignment, FailurePoint::SocketConnection, FailurePoint::QueueEntry]
    );
}

#[test]
fn table_not_assigned_has_second_tier_reason() {
    let log = [registration("R1"), table_pending("R1")].concat();
    let result = classifier().classify_session(&log, "R1", EvaluationMode::Independent).unwrap();
    let stage = result.stage(Stage::TableAssignment);
    assert!(stage.is_failed());
    assert_eq!(stage.reason.as_deref(), Some("table assignment failed or status not assigned"));
}

#[test]
fn registration_without_success_marker() {
    let log = "API New Request: /v1.0/super/tournament/registerTournament {}\nAPI Error: 402\n";
    let result = classifier().classify_session(log, "R1", EvaluationMode::Independent).unwrap();
    assert_eq!(result.failure_point(), FailurePoint::Registration);
    assert_eq!(
        result.stage(Stage::Registration).reason.as_deref(),
        Some("registration API failed or id not generated")
    );
}

#[test]
fn explicit_socket_failure_vs_silence() {
    let base = [registration("R1"), table_assignment("R1"), socket_url("R1")].concat();

    let failed = classifier()
        .classify_session(&(base.clone() + &socket_failed("R1")), "R1", EvaluationMode::Independent)
        .unwrap();
    assert_eq!(failed.failure_point(), FailurePoint::SocketConnection);
    assert_eq!(failed.failure_type(), FailureType::NetworkFailure);
    assert_eq!(
        failed.stage(Stage::SocketConnection).reason.as_deref(),
        Some("explicit connection failure")
    );

    let silent = classifier().classify_session(&base, "R1", EvaluationMode::Independent).unwrap();
    assert_eq!(silent.stage(Stage::SocketConnection).reason.as_deref(), Some("no confirmation found"));
}

#[test]
fn connected_beats_failed_socket_marker() {
    let log = [
        registration("R1"),
        table_assignment("R1"),
        socket_url("R1"),
        socket_failed("R1"),
        socket_connected("R1"),
    ]
    .concat();
    let result = classifier().classify_session(&log, "R1", EvaluationMode::Independent).unwrap();
    assert!(result.stage(Stage::SocketConnection).is_success());
}

// ─── Matchmaking lifecycle ─────────────────────────────────────────────────

fn connected(id: &str) -> String {
    [registration(id), table_assignment(id), socket_url(id), socket_connected(id)].concat()
}

#[test]
fn missing_queue_entry() {
    let result = classifier()
        .classify_session(&connected("R1"), "R1", EvaluationMode::Independent)
        .unwrap();
    assert_eq!(result.failure_point(), FailurePoint::QueueEntry);
    assert_eq!(result.failure_type(), FailureType::QueueEntryFailure);
}

#[test]
fn server_failure_beats_client_timeout() {
    let log = [connected("R1"), queue_entry("R1"), TIMER_EXPIRED.to_string(), matchmaking_failed("R1")].concat();
    let result = classifier().classify_session(&log, "R1", EvaluationMode::Independent).unwrap();
    assert_eq!(result.failure_point(), FailurePoint::MatchmakingLogic);
    assert_eq!(result.failure_type(), FailureType::ServerSideMatchmakingFailure);
    let hints = recommendations_for(&result);
    assert_eq!(hints.last().map(String::as_str), Some("Examine specific pod IP: 10.2.3.4"));
}

#[test]
fn timer_expiry_is_client_side_timeout() {
    let log = [connected("R1"), queue_entry("R1"), TIMER_EXPIRED.to_string()].concat();
    let result = classifier().classify_session(&log, "R1", EvaluationMode::Independent).unwrap();
    assert_eq!(result.failure_point(), FailurePoint::ServerUnresponsive);
    assert_eq!(result.failure_type(), FailureType::ClientSideTimeout);
}

#[test]
fn queue_entry_without_outcome_is_unknown() {
    let log = [connected("R1"), queue_entry("R1")].concat();
    let result = classifier().classify_session(&log, "R1", EvaluationMode::Independent).unwrap();
    assert_eq!(result.failure_point(), FailurePoint::MatchmakingUnknown);
    assert_eq!(result.failure_type(), FailureType::UnknownMatchmakingFailure);
}

#[test]
fn lifecycle_success_overrides_earlier_failures() {
    // A retried session: the socket attempt was never logged, yet a round started.
    let log = [registration("R1"), table_assignment("R1"), queue_entry("R1"), round_starting("R1")].concat();
    let result = classifier().classify_session(&log, "R1", EvaluationMode::Independent).unwrap();
    assert_eq!(result.failure_point(), FailurePoint::NoFailure);
    assert_eq!(result.failure_type(), FailureType::Success);
    assert_eq!(result.all_failure_points(), &[FailurePoint::SocketConnection]);

    // Short-circuit never reaches the lifecycle stage, so the socket failure stands.
    let strict = classifier().classify_session(&log, "R1", EvaluationMode::ShortCircuit).unwrap();
    assert_eq!(strict.failure_point(), FailurePoint::SocketConnection);
    assert_eq!(strict.stage(Stage::MatchmakingLifecycle).status, StageStatus::Unknown);
}

// ─── Modes & contract ──────────────────────────────────────────────────────

#[test]
fn modes_agree_on_primary_point_without_overrides() {
    let logs = [
        String::new(),
        registration("R1"),
        connected("R1"),
        [connected("R1"), queue_entry("R1"), matchmaking_failed("R1")].concat(),
        full_success("R1"),
    ];
    for log in &logs {
        let a = classifier().classify_session(log, "R1", EvaluationMode::Independent).unwrap();
        let b = classifier().classify_session(log, "R1", EvaluationMode::ShortCircuit).unwrap();
        assert_eq!(a.failure_point(), b.failure_point());
        assert_eq!(a.all_failure_points(), b.all_failure_points());
    }
}

#[test]
fn line_break_in_session_id_is_rejected() {
    let err = classifier()
        .classify_session("", "R1\nR2", EvaluationMode::Independent)
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_SESSION_ID");
}

#[test]
fn custom_marker_table() {
    let mut markers = MarkerTable::default();
    markers.socket_connection.success.anchors = vec![
        "WS ready".to_string(),
        "\"registrationId\":\"{session_id}\"".to_string(),
    ];
    let c = FailureClassifier::new(&markers).unwrap();
    let log = [
        registration("R1"),
        table_assignment("R1"),
        socket_url("R1"),
        "WS ready {\"registrationId\":\"R1\"}\n".to_string(),
    ]
    .concat();
    let result = c.classify_session(&log, "R1", EvaluationMode::Independent).unwrap();
    assert!(result.stage(Stage::SocketConnection).is_success());
}

#[test]
fn classification_serializes_with_stage_names() {
    let result = classifier()
        .classify_session(&registration("R1"), "R1", EvaluationMode::ShortCircuit)
        .unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["failure_point"], json!("TABLE_ASSIGNMENT"));
    assert_eq!(value["mode"], json!("short-circuit"));
    assert_eq!(value["stages"][0]["stage"], json!("REGISTRATION"));
    assert_eq!(value["stages"][2]["status"], json!("UNKNOWN"));
}
