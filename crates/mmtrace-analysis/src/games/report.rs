//! Capacity report over a game-user table.

use std::collections::BTreeMap;

use mmtrace_core::{AnalysisConfig, CapacityStatus, GameSize};
use serde::Serialize;

use super::row::{group_failed_games, FailedGame, TableRow};
use super::simultaneous::{missed_merges, simultaneous_failures, SimultaneousGroup};
use super::timing::{slow_failures, TimingReport};
use super::users::{top_failing_users, UserFailures};
use crate::aggregation::{percentage, CrossTab, Denominator, FrequencyRow, FrequencyTable, HealthVerdict};
use crate::capacity::SIX_PLAYER_PLAYABLE_MIN;

/// Maximum example game ids kept per suspicious combination.
const SUSPICIOUS_EXAMPLES: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantBucket {
    pub participants: i64,
    pub games: usize,
    pub percentage: f64,
}

/// How full the failed 6-player games were.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SixPlayerBreakdown {
    pub games: usize,
    pub histogram: Vec<ParticipantBucket>,
    /// Games with at least the playable minimum of participants.
    pub playable_games: usize,
    pub playable_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FishyRate {
    pub game_size: GameSize,
    pub games: usize,
    pub fishy: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuspiciousGroup {
    pub game_size: GameSize,
    pub capacity: Option<i64>,
    pub participants: i64,
    pub games: usize,
    pub example_game_ids: Vec<String>,
}

/// Totals over the simultaneous groups that include a CGP player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MissedMergeSummary {
    pub opportunities: usize,
    pub players: usize,
    pub cgp_players: usize,
}

impl MissedMergeSummary {
    fn of(groups: &[SimultaneousGroup]) -> Self {
        missed_merges(groups).fold(Self::default(), |acc, g| Self {
            opportunities: acc.opportunities + 1,
            players: acc.players + g.failures,
            cgp_players: acc.cgp_players + g.cgp_players,
        })
    }
}

/// Everything derived from one game-user table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityReport {
    pub failure_rows: usize,
    pub failed_games: usize,
    pub size_distribution: Vec<FrequencyRow>,
    pub status_distribution: Vec<FrequencyRow>,
    /// Game size × capacity status.
    pub size_by_status: CrossTab,
    pub six_player: SixPlayerBreakdown,
    pub fishy_rates: Vec<FishyRate>,
    pub suspicious: Vec<SuspiciousGroup>,
    pub fishy_pct: f64,
    pub health: HealthVerdict,
    pub timing: TimingReport,
    /// Game ids whose shortest wait reached the slow threshold.
    pub slow_failures: Vec<String>,
    pub simultaneous: Vec<SimultaneousGroup>,
    pub missed_merges: MissedMergeSummary,
    pub top_users: Vec<UserFailures>,
    pub games: Vec<FailedGame>,
}

impl CapacityReport {
    pub fn build(rows: &[TableRow], config: &AnalysisConfig) -> Self {
        let failure_rows = rows.iter().filter(|r| r.is_failure(&config.failure_reason)).count();
        let games = group_failed_games(rows, &config.failure_reason);
        tracing::info!(rows = rows.len(), failure_rows, games = games.len(), "building capacity report");

        let sizes: FrequencyTable = games.iter().map(|g| g.game_size().label()).collect();
        let statuses: FrequencyTable = games.iter().map(|g| g.classification.status.label()).collect();
        let size_by_status: CrossTab = games
            .iter()
            .map(|g| (g.game_size().label(), g.classification.status.label()))
            .collect();

        let fishy = statuses.count(CapacityStatus::Fishy.label());
        let fishy_pct = percentage(fishy, games.len());
        let health = HealthVerdict::assess(fishy_pct, config);
        if health != HealthVerdict::Healthy {
            tracing::warn!(fishy_pct, %health, "fishy failures above threshold");
        }

        let simultaneous = simultaneous_failures(rows, config);
        let missed_merges = MissedMergeSummary::of(&simultaneous);

        Self {
            failure_rows,
            failed_games: games.len(),
            size_distribution: sizes.rows(Denominator::Total),
            status_distribution: statuses.rows(Denominator::Total),
            size_by_status,
            six_player: six_player_breakdown(&games),
            fishy_rates: fishy_rates(&games),
            suspicious: suspicious_groups(&games),
            fishy_pct,
            health,
            timing: TimingReport::build(&games, config),
            slow_failures: slow_failures(&games, config).iter().map(|g| g.game_id.clone()).collect(),
            simultaneous,
            missed_merges,
            top_users: top_failing_users(rows, &games, &config.failure_reason, config.top_n),
            games,
        }
    }
}

fn six_player_breakdown(games: &[FailedGame]) -> SixPlayerBreakdown {
    let six: Vec<i64> = games
        .iter()
        .filter(|g| g.game_size() == GameSize::SixPlayer)
        .map(|g| g.classification.participant_count)
        .collect();
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for &p in &six {
        *counts.entry(p).or_insert(0) += 1;
    }
    let playable = six.iter().filter(|&&p| p >= SIX_PLAYER_PLAYABLE_MIN).count();
    SixPlayerBreakdown {
        games: six.len(),
        histogram: counts
            .into_iter()
            .map(|(participants, n)| ParticipantBucket {
                participants,
                games: n,
                percentage: percentage(n, six.len()),
            })
            .collect(),
        playable_games: playable,
        playable_pct: percentage(playable, six.len()),
    }
}

fn fishy_rates(games: &[FailedGame]) -> Vec<FishyRate> {
    [GameSize::TwoPlayer, GameSize::SixPlayer]
        .into_iter()
        .map(|size| {
            let of_size = games.iter().filter(|g| g.game_size() == size);
            let total = of_size.clone().count();
            let fishy = of_size
                .filter(|g| g.classification.status == CapacityStatus::Fishy)
                .count();
            FishyRate {
                game_size: size,
                games: total,
                fishy,
                percentage: percentage(fishy, total),
            }
        })
        .collect()
}

fn suspicious_groups(games: &[FailedGame]) -> Vec<SuspiciousGroup> {
    let mut groups: BTreeMap<(GameSize, Option<i64>, i64), SuspiciousGroup> = BTreeMap::new();
    for game in games.iter().filter(|g| g.classification.status == CapacityStatus::Suspicious) {
        let c = &game.classification;
        let group = groups
            .entry((c.game_size, c.capacity, c.participant_count))
            .or_insert_with(|| SuspiciousGroup {
                game_size: c.game_size,
                capacity: c.capacity,
                participants: c.participant_count,
                games: 0,
                example_game_ids: Vec::new(),
            });
        group.games += 1;
        if group.example_game_ids.len() < SUSPICIOUS_EXAMPLES {
            group.example_game_ids.push(game.game_id.clone());
        }
    }
    let mut out: Vec<SuspiciousGroup> = groups.into_values().collect();
    out.sort_by(|a, b| b.games.cmp(&a.games));
    out
}
