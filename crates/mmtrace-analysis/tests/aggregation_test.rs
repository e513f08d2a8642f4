//! Session summaries and capacity reports built from realistic batches.

mod common;

use common::*;
use mmtrace_analysis::aggregation::{HealthVerdict, SessionSummary};
use mmtrace_analysis::games::{CapacityReport, TableRow};
use mmtrace_analysis::FailureClassifier;
use mmtrace_core::{AnalysisConfig, CapacityStatus, EvaluationMode, GameSize, SessionAttempt};

// ─── Helpers ───────────────────────────────────────────────────────────────

fn failed_row(game: &str, user: &str, capacity: i64, created: &str, updated: &str, origin: &str) -> TableRow {
    TableRow {
        game_id: game.to_string(),
        user_id: user.to_string(),
        reason: "matchmaking-failed".to_string(),
        capacity: Some(capacity),
        created_at: Some(created.to_string()),
        updated_at: Some(updated.to_string()),
        created_by: Some(origin.to_string()),
        table_id: Some(format!("t-{game}")),
    }
}

fn sample_rows() -> Vec<TableRow> {
    vec![
        // 2-player, both present: fishy, instant
        failed_row("g1", "u1", 2, "2025-07-27 10:00:00.000", "2025-07-27 10:00:00.400", "rummy-registration"),
        failed_row("g1", "u2", 2, "2025-07-27 10:00:00.100", "2025-07-27 10:00:00.450", "new-game-start"),
        // 2-player, alone: normal, full timeout
        failed_row("g2", "u3", 2, "2025-07-27 10:01:00", "2025-07-27 10:02:00", "rummy-registration"),
        // 6-player with 4: fishy
        failed_row("g3", "u4", 6, "2025-07-27 10:03:00", "2025-07-27 10:03:07", "rummy-registration"),
        failed_row("g3", "u5", 6, "2025-07-27 10:03:01", "2025-07-27 10:03:07", "rummy-registration"),
        failed_row("g3", "u6", 6, "2025-07-27 10:03:02", "2025-07-27 10:03:07", "rummy-registration"),
        failed_row("g3", "u1", 6, "2025-07-27 10:03:03", "2025-07-27 10:03:07", "new-game-start"),
        // 6-player with 2: normal
        failed_row("g4", "u7", 6, "2025-07-27 10:04:00", "2025-07-27 10:04:03", "rummy-registration"),
        failed_row("g4", "u8", 6, "2025-07-27 10:04:00", "2025-07-27 10:04:03", "rummy-registration"),
        // 2-player with 3: suspicious
        failed_row("g5", "u1", 2, "bad", "2025-07-27 10:05:00", "rummy-registration"),
        failed_row("g5", "u9", 2, "bad", "2025-07-27 10:05:00", "rummy-registration"),
        failed_row("g5", "u10", 2, "bad", "2025-07-27 10:05:00", "rummy-registration"),
        // Completed game: ignored
        TableRow {
            game_id: "g6".to_string(),
            user_id: "u11".to_string(),
            reason: "game-completed".to_string(),
            capacity: Some(2),
            ..Default::default()
        },
    ]
}

// ─── Capacity report ───────────────────────────────────────────────────────

#[test]
fn capacity_report_counts_games_and_statuses() {
    let report = CapacityReport::build(&sample_rows(), &AnalysisConfig::default());
    assert_eq!(report.failure_rows, 12);
    assert_eq!(report.failed_games, 5);

    let status = |label: &str| {
        report
            .status_distribution
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.count)
            .unwrap_or(0)
    };
    assert_eq!(status("FISHY"), 2);
    assert_eq!(status("NORMAL"), 2);
    assert_eq!(status("SUSPICIOUS"), 1);
    assert_eq!(report.size_by_status.count("2-PLAYER", "SUSPICIOUS"), 1);

    // 2 of 5 games fishy: 40% is above the critical threshold.
    assert!((report.fishy_pct - 40.0).abs() < 1e-9);
    assert_eq!(report.health, HealthVerdict::Critical);
}

#[test]
fn six_player_histogram_and_fishy_rates() {
    let report = CapacityReport::build(&sample_rows(), &AnalysisConfig::default());
    let six = &report.six_player;
    assert_eq!(six.games, 2);
    assert_eq!(six.playable_games, 1);
    assert_eq!(six.playable_pct, 50.0);
    let participants: Vec<i64> = six.histogram.iter().map(|b| b.participants).collect();
    assert_eq!(participants, vec![2, 4]);

    let two = report.fishy_rates.iter().find(|r| r.game_size == GameSize::TwoPlayer).unwrap();
    assert_eq!((two.games, two.fishy), (3, 1));
}

#[test]
fn suspicious_groups_keep_examples() {
    let report = CapacityReport::build(&sample_rows(), &AnalysisConfig::default());
    assert_eq!(report.suspicious.len(), 1);
    let group = &report.suspicious[0];
    assert_eq!(group.participants, 3);
    assert_eq!(group.example_game_ids, vec!["g5"]);
    let game = report.games.iter().find(|g| g.game_id == "g5").unwrap();
    assert_eq!(game.classification.status, CapacityStatus::Suspicious);
    assert_eq!(game.min_wait_secs, None);
}

#[test]
fn timing_uses_minimum_wait_per_game() {
    let report = CapacityReport::build(&sample_rows(), &AnalysisConfig::default());
    let timing = &report.timing;
    assert_eq!(timing.games_with_timing, 4);
    assert_eq!(timing.games_without_timing, 1);
    let buckets: Vec<(&str, usize)> = timing.buckets.iter().map(|b| (b.bucket.as_str(), b.games)).collect();
    assert_eq!(buckets, vec![("< 2 seconds", 1), ("2-5 seconds", 2), (">= 5 seconds", 1)]);
    assert_eq!(timing.max_secs, Some(60.0));
    assert_eq!(report.slow_failures, vec!["g2"]);
}

#[test]
fn simultaneous_groups_and_top_users() {
    let report = CapacityReport::build(&sample_rows(), &AnalysisConfig::default());
    let sizes: Vec<usize> = report.simultaneous.iter().map(|g| g.failures).collect();
    assert_eq!(sizes, vec![4, 3, 2, 2]);
    assert_eq!(report.simultaneous[0].games, vec!["g3"]);
    assert_eq!(report.simultaneous[0].origins["new-game-start"], 1);

    // g3 and g1 each had a player back from a finished game; g5 and g4 did not.
    let flags: Vec<bool> = report.simultaneous.iter().map(|g| g.is_cgp_opportunity).collect();
    assert_eq!(flags, vec![true, false, true, false]);
    assert_eq!(report.missed_merges.opportunities, 2);
    assert_eq!(report.missed_merges.players, 6);
    assert_eq!(report.missed_merges.cgp_players, 2);

    assert_eq!(report.top_users[0].user_id, "u1");
    assert_eq!(report.top_users[0].failures, 3);
    assert_eq!(report.top_users[0].game_sizes, vec![GameSize::TwoPlayer, GameSize::SixPlayer]);
}

#[test]
fn empty_table_is_healthy() {
    let report = CapacityReport::build(&[], &AnalysisConfig::default());
    assert_eq!(report.failed_games, 0);
    assert_eq!(report.fishy_pct, 0.0);
    assert_eq!(report.health, HealthVerdict::Healthy);
    assert_eq!(report.timing.mean_secs, None);
}

// ─── Session summary ───────────────────────────────────────────────────────

#[test]
fn session_summary_over_batch() {
    let attempts = vec![
        SessionAttempt::new("A").with_version(450).with_log(full_success("A")),
        SessionAttempt::new("B").with_version(450).with_log(registration("B")),
        SessionAttempt::new("C").with_version(440).with_log(registration("C")),
        SessionAttempt {
            capacity: Some(2),
            participant_count: Some(2),
            ..SessionAttempt::new("D").with_version(447)
        },
        SessionAttempt {
            capacity: None,
            participant_count: Some(1),
            ..SessionAttempt::new("E").with_version(450).with_log(full_success("E"))
        },
    ];
    let classifier = FailureClassifier::with_defaults().unwrap();
    let records = classifier.classify_batch(&attempts, EvaluationMode::Independent).unwrap();
    let summary = SessionSummary::build(&records, EvaluationMode::Independent, &AnalysisConfig::default());

    assert_eq!(summary.total_sessions, 5);
    assert_eq!(summary.failed_sessions, 3);
    assert_eq!(summary.successful_sessions, 2);
    assert_eq!(summary.sessions_without_log, 1);
    assert_eq!(summary.failure_rate, 60.0);

    // Only D and E carry participant counts; E's capacity is unknown.
    assert_eq!(summary.sessions_with_capacity, 2);
    let status = |label: &str| summary.capacity_statuses.iter().find(|r| r.label == label).map(|r| r.count);
    assert_eq!(status("FISHY"), Some(1));
    assert_eq!(status("SUSPICIOUS"), Some(1));
    assert_eq!(summary.game_sizes.len(), 2);
    assert_eq!(records[3].capacity.as_ref().unwrap().game_size, GameSize::TwoPlayer);

    let sum: f64 = summary.failure_points.iter().map(|r| r.percentage).sum();
    assert!((sum - 100.0).abs() < 1e-9);
    // NO_FAILURE and TABLE_ASSIGNMENT tie on 2; equal counts sort by label.
    let labels: Vec<&str> = summary.failure_points.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["NO_FAILURE", "TABLE_ASSIGNMENT", "REGISTRATION"]);
    assert!((summary.failed_by_point[0].percentage - 200.0 / 3.0).abs() < 1e-9);

    assert_eq!(summary.version_analysis.count(">= 448", "NO_FAILURE"), 2);
    assert_eq!(summary.version_analysis.count("< 448", "TABLE_ASSIGNMENT"), 1);
    assert_eq!(summary.version_analysis.count("< 448", "REGISTRATION"), 1);

    // Two allocation failures outrank the one registration failure.
    assert_eq!(summary.top_recommendations[0].mentions, 2);
    assert_eq!(summary.top_recommendations[0].recommendation, "Investigate game server allocation service health");
}
