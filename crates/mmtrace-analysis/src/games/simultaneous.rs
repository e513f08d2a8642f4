//! Failures that landed in the same rounded instant.
//!
//! A group is a missed merge opportunity when at least one of its players
//! came back from a finished game (`cgp_origin`): the server had two waiting
//! players and did not seat them together.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};
use mmtrace_core::config::MAX_MERGE_WINDOW_SECS;
use mmtrace_core::AnalysisConfig;
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::row::TableRow;
use super::timing::parse_timestamp;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimultaneousGroup {
    /// Rounded failure instant, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    pub failures: usize,
    /// Distinct game ids, first-seen order.
    pub games: Vec<String>,
    /// Distinct user ids, first-seen order.
    pub participants: Vec<String>,
    /// Failure rows per `created_by` origin.
    pub origins: BTreeMap<String, usize>,
    /// Failure rows from players rejoining after a finished game.
    pub cgp_players: usize,
    /// Failure rows from fresh registrations.
    pub new_players: usize,
    pub is_cgp_opportunity: bool,
}

/// Round to the nearest multiple of `window_secs`. Exact halves go to the
/// even multiple.
pub fn round_to_window(ts: NaiveDateTime, window_secs: i64) -> NaiveDateTime {
    let window_ms = window_secs.clamp(1, MAX_MERGE_WINDOW_SECS) * 1000;
    let ms = ts.and_utc().timestamp_millis();
    let (quotient, remainder) = (ms.div_euclid(window_ms), ms.rem_euclid(window_ms));
    let round_up = match (2 * remainder).cmp(&window_ms) {
        Ordering::Greater => true,
        Ordering::Equal => quotient % 2 != 0,
        Ordering::Less => false,
    };
    let rounded = (quotient + i64::from(round_up)) * window_ms;
    DateTime::from_timestamp_millis(rounded)
        .map(|dt| dt.naive_utc())
        .unwrap_or(ts)
}

/// Group failure rows by rounded `updated_at` and keep groups of two or more,
/// largest first. Equal sizes keep first-seen order. Groups without a CGP
/// player are kept but not flagged as opportunities.
pub fn simultaneous_failures(rows: &[TableRow], config: &AnalysisConfig) -> Vec<SimultaneousGroup> {
    let mut index: FxHashMap<NaiveDateTime, usize> = FxHashMap::default();
    let mut groups: Vec<SimultaneousGroup> = Vec::new();

    for row in rows.iter().filter(|r| r.is_failure(&config.failure_reason)) {
        let Some(ts) = row.updated_at.as_deref().and_then(parse_timestamp) else {
            continue;
        };
        let key = round_to_window(ts, config.merge_window_secs);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(SimultaneousGroup {
                timestamp: key.format("%Y-%m-%d %H:%M:%S").to_string(),
                failures: 0,
                games: Vec::new(),
                participants: Vec::new(),
                origins: BTreeMap::new(),
                cgp_players: 0,
                new_players: 0,
                is_cgp_opportunity: false,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.failures += 1;
        push_distinct(&mut group.games, &row.game_id);
        push_distinct(&mut group.participants, &row.user_id);
        let origin = row.created_by.as_deref().filter(|o| !o.is_empty()).unwrap_or("unknown");
        *group.origins.entry(origin.to_string()).or_insert(0) += 1;
        if origin == config.cgp_origin {
            group.cgp_players += 1;
            group.is_cgp_opportunity = true;
        } else if origin == config.new_player_origin {
            group.new_players += 1;
        }
    }

    groups.retain(|g| g.failures >= 2);
    groups.sort_by(|a, b| b.failures.cmp(&a.failures));
    groups
}

/// Groups that count as missed merge opportunities.
pub fn missed_merges(groups: &[SimultaneousGroup]) -> impl Iterator<Item = &SimultaneousGroup> {
    groups.iter().filter(|g| g.is_cgp_opportunity)
}

fn push_distinct(values: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed_at(game: &str, user: &str, updated: &str, origin: &str) -> TableRow {
        TableRow {
            game_id: game.into(),
            user_id: user.into(),
            reason: "matchmaking-failed".into(),
            updated_at: Some(updated.into()),
            created_by: Some(origin.into()),
            ..Default::default()
        }
    }

    fn rounded(raw: &str, window: i64) -> String {
        let ts = parse_timestamp(raw).unwrap();
        round_to_window(ts, window).format("%Y-%m-%d %H:%M:%S").to_string()
    }

    #[test]
    fn rounds_to_nearest_second() {
        assert_eq!(rounded("2025-07-27 11:52:11.499", 1), "2025-07-27 11:52:11");
        assert_eq!(rounded("2025-07-27 11:52:11.501", 1), "2025-07-27 11:52:12");
    }

    #[test]
    fn exact_halves_round_to_even() {
        assert_eq!(rounded("2025-07-27 11:52:11.500", 1), "2025-07-27 11:52:12");
        assert_eq!(rounded("2025-07-27 11:52:12.500", 1), "2025-07-27 11:52:12");
        // 5s window: 11:52:12.500 is exactly between :10 (even multiple) and :15.
        assert_eq!(rounded("2025-07-27 11:52:12.500", 5), "2025-07-27 11:52:10");
    }

    #[test]
    fn oversized_window_does_not_overflow() {
        assert_eq!(rounded("2025-07-27 11:52:11", i64::MAX), "2025-07-27 00:00:00");
    }

    #[test]
    fn groups_of_two_or_more_largest_first() {
        let rows = vec![
            failed_at("g1", "u1", "2025-07-27 10:00:00.100", "new-game-start"),
            failed_at("g2", "u2", "2025-07-27 10:00:05.000", "rummy-registration"),
            failed_at("g1", "u3", "2025-07-27 10:00:00.300", "rummy-registration"),
            failed_at("g3", "u4", "2025-07-27 10:00:05.200", "rummy-registration"),
            failed_at("g4", "u5", "2025-07-27 10:00:04.900", "rummy-registration"),
            failed_at("g9", "u9", "2025-07-27 11:00:00", "rummy-registration"),
        ];
        let groups = simultaneous_failures(&rows, &AnalysisConfig::default());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].timestamp, "2025-07-27 10:00:05");
        assert_eq!(groups[0].failures, 3);
        assert_eq!(groups[0].games, vec!["g2", "g3", "g4"]);
        assert_eq!(groups[1].games, vec!["g1"]);
        assert_eq!(groups[1].participants, vec!["u1", "u3"]);
        assert_eq!(groups[1].origins["new-game-start"], 1);
        assert!(groups[1].is_cgp_opportunity);
        assert_eq!(groups[1].cgp_players, 1);
    }

    #[test]
    fn group_without_cgp_player_is_not_an_opportunity() {
        let rows = vec![
            failed_at("g1", "u1", "2025-07-27 10:00:00.100", "rummy-registerations"),
            failed_at("g2", "u2", "2025-07-27 10:00:00.200", "rummy-registerations"),
            failed_at("g3", "u3", "2025-07-27 10:00:07.000", "new-game-start"),
            failed_at("g4", "u4", "2025-07-27 10:00:07.100", "rummy-registerations"),
        ];
        let groups = simultaneous_failures(&rows, &AnalysisConfig::default());
        assert_eq!(groups.len(), 2);
        assert!(!groups[0].is_cgp_opportunity);
        assert_eq!((groups[0].cgp_players, groups[0].new_players), (0, 2));
        assert!(groups[1].is_cgp_opportunity);
        assert_eq!((groups[1].cgp_players, groups[1].new_players), (1, 1));

        let missed: Vec<&str> = missed_merges(&groups).map(|g| g.timestamp.as_str()).collect();
        assert_eq!(missed, vec!["2025-07-27 10:00:07"]);
    }

    #[test]
    fn cgp_origin_is_configurable() {
        let config = AnalysisConfig {
            cgp_origin: "rejoin".to_string(),
            ..AnalysisConfig::default()
        };
        let rows = vec![
            failed_at("g1", "u1", "2025-07-27 10:00:00", "rejoin"),
            failed_at("g2", "u2", "2025-07-27 10:00:00", "new-game-start"),
        ];
        let groups = simultaneous_failures(&rows, &config);
        assert!(groups[0].is_cgp_opportunity);
        assert_eq!((groups[0].cgp_players, groups[0].new_players), (1, 0));
    }
}
