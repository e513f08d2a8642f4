//! Game-user table rows and failed-game grouping.

use mmtrace_core::GameSize;
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::timing::wait_seconds;
use crate::capacity::{classify_capacity, game_size, CapacityClassification};

/// One user's row against one game, as exported from the game-user table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub game_id: String,
    pub user_id: String,
    pub reason: String,
    pub capacity: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Flow that created the row, e.g. a fresh registration or a continuing game.
    pub created_by: Option<String>,
    pub table_id: Option<String>,
}

impl TableRow {
    pub fn is_failure(&self, failure_reason: &str) -> bool {
        self.reason.trim() == failure_reason
    }

    /// Seconds between row creation and the failure update, when both parse.
    pub fn wait_secs(&self) -> Option<f64> {
        wait_seconds(self.created_at.as_deref()?, self.updated_at.as_deref()?)
    }
}

/// A game with at least one failure row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedGame {
    pub game_id: String,
    pub table_id: Option<String>,
    /// First non-empty capacity among the game's rows.
    pub capacity: Option<i64>,
    /// Distinct user ids, first-seen order.
    pub participants: Vec<String>,
    pub failure_rows: usize,
    /// Shortest wait across the game's rows.
    pub min_wait_secs: Option<f64>,
    pub classification: CapacityClassification,
}

impl FailedGame {
    pub fn game_size(&self) -> GameSize {
        self.classification.game_size
    }
}

/// Group failure rows by game id, in first-seen order, and classify each game.
/// Rows without a game id are skipped.
pub fn group_failed_games(rows: &[TableRow], failure_reason: &str) -> Vec<FailedGame> {
    struct Acc<'a> {
        game_id: &'a str,
        table_id: Option<&'a str>,
        capacity: Option<i64>,
        participants: Vec<&'a str>,
        failure_rows: usize,
        min_wait: Option<f64>,
    }

    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut games: Vec<Acc<'_>> = Vec::new();

    for row in rows.iter().filter(|r| r.is_failure(failure_reason)) {
        let game_id = row.game_id.trim();
        if game_id.is_empty() {
            tracing::warn!(user_id = %row.user_id, "failure row without game id skipped");
            continue;
        }
        let slot = *index.entry(game_id).or_insert_with(|| {
            games.push(Acc {
                game_id,
                table_id: None,
                capacity: None,
                participants: Vec::new(),
                failure_rows: 0,
                min_wait: None,
            });
            games.len() - 1
        });
        let acc = &mut games[slot];
        acc.failure_rows += 1;
        if acc.capacity.is_none() {
            acc.capacity = row.capacity;
        }
        if acc.table_id.is_none() {
            acc.table_id = row.table_id.as_deref().filter(|t| !t.is_empty());
        }
        let user = row.user_id.trim();
        if !user.is_empty() && !acc.participants.contains(&user) {
            acc.participants.push(user);
        }
        if let Some(wait) = row.wait_secs() {
            acc.min_wait = Some(acc.min_wait.map_or(wait, |m: f64| m.min(wait)));
        }
    }

    games
        .into_iter()
        .map(|acc| FailedGame {
            game_id: acc.game_id.to_string(),
            table_id: acc.table_id.map(str::to_string),
            capacity: acc.capacity,
            participants: acc.participants.iter().map(|p| p.to_string()).collect(),
            failure_rows: acc.failure_rows,
            min_wait_secs: acc.min_wait,
            classification: classify_capacity(acc.capacity, acc.participants.len() as i64),
        })
        .collect()
}

/// Game size per game id, for joining rows back to their game.
pub fn sizes_by_game(games: &[FailedGame]) -> FxHashMap<&str, GameSize> {
    games
        .iter()
        .map(|g| (g.game_id.as_str(), game_size(g.capacity)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmtrace_core::CapacityStatus;

    fn row(game: &str, user: &str, cap: Option<i64>) -> TableRow {
        TableRow {
            game_id: game.into(),
            user_id: user.into(),
            reason: "matchmaking-failed".into(),
            capacity: cap,
            ..Default::default()
        }
    }

    #[test]
    fn groups_distinct_participants_and_first_capacity() {
        let rows = vec![
            row("g1", "u1", None),
            row("g2", "u9", Some(6)),
            row("g1", "u2", Some(2)),
            row("g1", "u1", Some(6)),
        ];
        let games = group_failed_games(&rows, "matchmaking-failed");
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].game_id, "g1");
        assert_eq!(games[0].participants, vec!["u1", "u2"]);
        assert_eq!(games[0].failure_rows, 3);
        assert_eq!(games[0].capacity, Some(2));
        assert_eq!(games[0].classification.status, CapacityStatus::Fishy);
        assert_eq!(games[1].classification.status, CapacityStatus::Normal);
    }

    #[test]
    fn other_reasons_are_ignored() {
        let mut ok = row("g1", "u1", Some(2));
        ok.reason = "game-completed".into();
        assert!(group_failed_games(&[ok], "matchmaking-failed").is_empty());
    }
}
