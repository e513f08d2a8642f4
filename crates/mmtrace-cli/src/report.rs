//! Report writers: JSON documents, plain-text reports and CSV exports.

use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use mmtrace_analysis::aggregation::{FrequencyRow, SessionSummary};
use mmtrace_analysis::games::CapacityReport;
use mmtrace_analysis::{recommendations_for, FailureRecord};
use mmtrace_core::StageStatus;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::csv::format_record;

pub const SUMMARY_FILE: &str = "analysis_summary.json";
pub const SESSION_REPORT_FILE: &str = "analysis_report.txt";
pub const SESSION_CSV_FILE: &str = "analysis_results.csv";
pub const CAPACITY_FILE: &str = "capacity_analysis.json";
pub const CAPACITY_REPORT_FILE: &str = "capacity_report.txt";
pub const FAILED_GAMES_CSV_FILE: &str = "failed_games.csv";

const RULE: &str = "================================================================";

#[derive(Serialize)]
struct SessionDocument<'a> {
    #[serde(flatten)]
    record: &'a FailureRecord,
    recommendations: Vec<String>,
}

#[derive(Serialize)]
struct Generated<'a, T: Serialize> {
    generated_at: String,
    #[serde(flatten)]
    body: &'a T,
}

impl<'a, T: Serialize> Generated<'a, T> {
    fn now(body: &'a T) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            body,
        }
    }
}

/// File-system safe form of a session id.
pub fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect()
}

/// Per-session JSON file names. Ids that sanitize to the same name get a
/// numeric suffix in input order, so every session keeps its own file.
pub fn session_file_names(records: &[FailureRecord]) -> Vec<String> {
    let mut used: FxHashSet<String> = FxHashSet::default();
    records
        .iter()
        .map(|record| {
            let base = sanitize_id(record.classification.session_id());
            let mut stem = base.clone();
            let mut n = 1;
            while !used.insert(stem.clone()) {
                n += 1;
                stem = format!("{base}-{n}");
            }
            if n > 1 {
                tracing::warn!(
                    session_id = record.classification.session_id(),
                    file = %stem,
                    "session id collides with another after sanitizing"
                );
            }
            format!("{stem}_analysis.json")
        })
        .collect()
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn prepare(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating output directory {}", dir.display()))
}

// ─── Sessions ──────────────────────────────────────────────────────────────

/// Write per-session JSON, the summary, the text report and the CSV export.
/// Returns the paths written.
pub fn write_session_outputs(dir: &Path, records: &[FailureRecord], summary: &SessionSummary) -> Result<Vec<PathBuf>> {
    prepare(dir)?;
    let mut written = Vec::with_capacity(records.len() + 3);

    for (record, name) in records.iter().zip(session_file_names(records)) {
        let path = dir.join(name);
        let doc = SessionDocument {
            record,
            recommendations: recommendations_for(&record.classification),
        };
        write_json(&path, &doc)?;
        written.push(path);
    }

    let path = dir.join(SUMMARY_FILE);
    write_json(&path, &Generated::now(summary))?;
    written.push(path);

    let path = dir.join(SESSION_REPORT_FILE);
    write_text(&path, &render_session_report(summary))?;
    written.push(path);

    let path = dir.join(SESSION_CSV_FILE);
    write_text(&path, &session_csv(records))?;
    written.push(path);

    tracing::info!(files = written.len(), dir = %dir.display(), "session reports written");
    Ok(written)
}

fn session_csv(records: &[FailureRecord]) -> String {
    let mut out = format_record(&[
        "session_id",
        "app_version",
        "failure_point",
        "failure_type",
        "all_failure_points",
        "log_available",
    ]);
    out.push('\n');
    for record in records {
        let c = &record.classification;
        let all: Vec<&str> = c.all_failure_points().iter().map(|p| p.name()).collect();
        out.push_str(&format_record(&[
            c.session_id().to_string(),
            record.app_version.map(|v| v.to_string()).unwrap_or_default(),
            c.failure_point().name().to_string(),
            c.failure_type().name().to_string(),
            all.join(";"),
            c.log_available().to_string(),
        ]));
        out.push('\n');
    }
    out
}

fn write_rows(out: &mut String, title: &str, rows: &[FrequencyRow]) -> fmt::Result {
    writeln!(out, "{title}")?;
    if rows.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for row in rows {
        writeln!(out, "  {:<28} {:>6}  {:>6.1}%", row.label, row.count, row.percentage)?;
    }
    writeln!(out)
}

pub fn render_session_report(summary: &SessionSummary) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = session_report_into(&mut out, summary);
    out
}

fn session_report_into(out: &mut String, s: &SessionSummary) -> fmt::Result {
    writeln!(out, "{RULE}")?;
    writeln!(out, "MATCHMAKING FAILURE ANALYSIS")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Evaluation mode:        {}", s.mode)?;
    writeln!(out, "Sessions analyzed:      {}", s.total_sessions)?;
    writeln!(out, "Failed sessions:        {} ({:.1}%)", s.failed_sessions, s.failure_rate)?;
    writeln!(out, "Successful sessions:    {}", s.successful_sessions)?;
    writeln!(out, "Sessions without log:   {}", s.sessions_without_log)?;
    writeln!(out, "Multi-cause sessions:   {}", s.multi_cause_sessions)?;
    writeln!(out)?;

    write_rows(out, "Primary failure points (all sessions):", &s.failure_points)?;
    write_rows(out, "Failure types:", &s.failure_types)?;
    write_rows(out, "Primary failure points (failed sessions):", &s.failed_by_point)?;
    write_rows(out, "All detected failure points:", &s.all_failure_points)?;
    write_rows(out, "App versions:", &s.version_buckets)?;
    if s.sessions_with_capacity > 0 {
        write_rows(out, "Game sizes (sessions with participant counts):", &s.game_sizes)?;
        write_rows(out, "Capacity status:", &s.capacity_statuses)?;
    }

    if !s.version_analysis.is_empty() {
        writeln!(out, "Failure points by app version:")?;
        for (bucket, columns) in s.version_analysis.rows() {
            writeln!(out, "  {bucket}")?;
            for (point, count) in columns {
                let share = s.version_analysis.row_share(bucket, point);
                writeln!(out, "    {point:<26} {count:>6}  {share:>6.1}%")?;
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "Top recommendations:")?;
    if s.top_recommendations.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (rank, r) in s.top_recommendations.iter().enumerate() {
        writeln!(out, "  {:>2}. {} ({} sessions)", rank + 1, r.recommendation, r.mentions)?;
    }
    Ok(())
}

/// One line per session for stdout.
pub fn session_line(record: &FailureRecord) -> String {
    let c = &record.classification;
    let failed: Vec<&str> = c
        .stages()
        .iter()
        .filter(|s| s.status == StageStatus::Failed)
        .map(|s| s.stage.name())
        .collect();
    if failed.is_empty() {
        format!("{}: {}", c.session_id(), c.failure_point())
    } else {
        format!("{}: {} [failed: {}]", c.session_id(), c.failure_point(), failed.join(", "))
    }
}

// ─── Capacity ──────────────────────────────────────────────────────────────

/// Write the capacity JSON, text report and failed-game CSV. Returns the paths written.
pub fn write_capacity_outputs(dir: &Path, report: &CapacityReport) -> Result<Vec<PathBuf>> {
    prepare(dir)?;
    let mut written = Vec::with_capacity(3);

    let path = dir.join(CAPACITY_FILE);
    write_json(&path, &Generated::now(report))?;
    written.push(path);

    let path = dir.join(CAPACITY_REPORT_FILE);
    write_text(&path, &render_capacity_report(report))?;
    written.push(path);

    let path = dir.join(FAILED_GAMES_CSV_FILE);
    write_text(&path, &failed_games_csv(report))?;
    written.push(path);

    tracing::info!(files = written.len(), dir = %dir.display(), "capacity reports written");
    Ok(written)
}

fn failed_games_csv(report: &CapacityReport) -> String {
    let mut out = format_record(&[
        "game_id",
        "table_id",
        "capacity",
        "participants",
        "game_size",
        "status",
        "rationale",
        "min_wait_secs",
    ]);
    out.push('\n');
    for game in &report.games {
        let c = &game.classification;
        out.push_str(&format_record(&[
            game.game_id.clone(),
            game.table_id.clone().unwrap_or_default(),
            game.capacity.map(|v| v.to_string()).unwrap_or_default(),
            c.participant_count.to_string(),
            c.game_size.label().to_string(),
            c.status.label().to_string(),
            c.rationale.to_string(),
            game.min_wait_secs.map(|w| format!("{w:.3}")).unwrap_or_default(),
        ]));
        out.push('\n');
    }
    out
}

pub fn render_capacity_report(report: &CapacityReport) -> String {
    let mut out = String::new();
    let _ = capacity_report_into(&mut out, report);
    out
}

fn capacity_report_into(out: &mut String, r: &CapacityReport) -> fmt::Result {
    writeln!(out, "{RULE}")?;
    writeln!(out, "FAILED GAME CAPACITY ANALYSIS")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Failure rows:   {}", r.failure_rows)?;
    writeln!(out, "Failed games:   {}", r.failed_games)?;
    writeln!(out)?;

    write_rows(out, "Game sizes:", &r.size_distribution)?;
    write_rows(out, "Capacity status:", &r.status_distribution)?;

    writeln!(out, "6-player games by participant count:")?;
    for bucket in &r.six_player.histogram {
        writeln!(out, "  {:>2} players {:>6}  {:>6.1}%", bucket.participants, bucket.games, bucket.percentage)?;
    }
    writeln!(
        out,
        "  playable (>= 3 players): {} of {} ({:.1}%)",
        r.six_player.playable_games, r.six_player.games, r.six_player.playable_pct
    )?;
    writeln!(out)?;

    writeln!(out, "Fishy rate by game size:")?;
    for rate in &r.fishy_rates {
        writeln!(
            out,
            "  {:<10} {:>4} of {:>5} games  {:>6.1}%",
            rate.game_size.label(),
            rate.fishy,
            rate.games,
            rate.percentage
        )?;
    }
    writeln!(out)?;

    if !r.suspicious.is_empty() {
        writeln!(out, "Suspicious games:")?;
        for group in &r.suspicious {
            let capacity = group.capacity.map(|c| c.to_string()).unwrap_or_else(|| "?".to_string());
            writeln!(
                out,
                "  {} capacity {} with {} players: {} games (e.g. {})",
                group.game_size.label(),
                capacity,
                group.participants,
                group.games,
                group.example_game_ids.join(", ")
            )?;
        }
        writeln!(out)?;
    }

    let t = &r.timing;
    writeln!(out, "Time to failure ({} games timed, {} without timestamps):", t.games_with_timing, t.games_without_timing)?;
    for bucket in &t.buckets {
        writeln!(out, "  {:<14} {:>6}  {:>6.1}%", bucket.bucket, bucket.games, bucket.percentage)?;
    }
    if let (Some(mean), Some(median), Some(min), Some(max)) = (t.mean_secs, t.median_secs, t.min_secs, t.max_secs) {
        writeln!(out, "  mean {mean:.2}s  median {median:.2}s  min {min:.2}s  max {max:.2}s")?;
    }
    if !r.slow_failures.is_empty() {
        writeln!(out, "  slow failures: {}", r.slow_failures.join(", "))?;
    }
    writeln!(out)?;

    if !r.simultaneous.is_empty() {
        writeln!(out, "Simultaneous failures:")?;
        for group in &r.simultaneous {
            let marker = if group.is_cgp_opportunity { " [missed merge]" } else { "" };
            writeln!(
                out,
                "  {}  {} failures across {} games, {} users ({} CGP, {} new){marker}",
                group.timestamp,
                group.failures,
                group.games.len(),
                group.participants.len(),
                group.cgp_players,
                group.new_players
            )?;
        }
        let m = &r.missed_merges;
        writeln!(
            out,
            "  missed merge opportunities: {} ({} players, {} CGP)",
            m.opportunities, m.players, m.cgp_players
        )?;
        writeln!(out)?;
    }

    if !r.top_users.is_empty() {
        writeln!(out, "Users with the most failures:")?;
        for user in &r.top_users {
            let sizes: Vec<&str> = user.game_sizes.iter().map(|s| s.label()).collect();
            writeln!(
                out,
                "  {:<24} {:>4}  {:>6.1}%  [{}]",
                user.user_id,
                user.failures,
                user.percentage,
                sizes.join(", ")
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Fishy games: {:.1}%", r.fishy_pct)?;
    writeln!(out, "Health: {} ({})", r.health, r.health.summary())
}
