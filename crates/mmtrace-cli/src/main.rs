//! mmtrace: classify failed matchmaking attempts.
//!
//! `sessions` reads a session table, finds each session's client log and
//! writes per-session verdicts plus a summary. `capacity` reads a game-user
//! table and reports failed games by participants and capacity.

mod args;
mod csv;
mod ingest;
mod logs;
mod report;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use mmtrace_analysis::aggregation::SessionSummary;
use mmtrace_analysis::games::CapacityReport;
use mmtrace_analysis::FailureClassifier;
use mmtrace_core::tracing::init_tracing;
use mmtrace_core::{MmtraceConfig, SessionAttempt};

use args::{Args, CapacityArgs, Command, SessionsArgs};

fn main() {
    if let Err(err) = run() {
        eprintln!("mmtrace: error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_filter());

    let config = load_config(args.config.as_deref())?;
    match args.command {
        Command::Sessions(cmd) => run_sessions(cmd, config),
        Command::Capacity(cmd) => run_capacity(cmd, &config),
    }
}

fn load_config(path: Option<&Path>) -> Result<MmtraceConfig> {
    match path {
        Some(path) => {
            let config = MmtraceConfig::from_file(path).with_context(|| format!("loading config {}", path.display()))?;
            tracing::info!(path = %path.display(), "config loaded");
            Ok(config)
        }
        None => Ok(MmtraceConfig::default()),
    }
}

fn read_input(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn run_sessions(cmd: SessionsArgs, mut config: MmtraceConfig) -> Result<()> {
    if let Some(minimum) = cmd.minimum_version {
        config.analysis.minimum_version = minimum;
    }
    let mode = cmd.mode.unwrap_or(config.analysis.default_mode);

    let text = read_input(&cmd.input)?;
    let mut attempts =
        ingest::read_sessions(&text).with_context(|| format!("parsing session table {}", cmd.input.display()))?;
    if !cmd.all_versions {
        retain_current_versions(&mut attempts, config.analysis.minimum_version);
    }
    logs::attach_logs(&mut attempts, &cmd.logs)?;

    let classifier = FailureClassifier::new(&config.markers).context("compiling log markers")?;
    let records = classifier.classify_batch(&attempts, mode)?;
    let summary = SessionSummary::build(&records, mode, &config.analysis);
    report::write_session_outputs(&cmd.output_dir, &records, &summary)?;

    for record in &records {
        println!("{}", report::session_line(record));
    }
    println!(
        "{} sessions, {} failed ({:.1}%), mode {}. Reports in {}",
        summary.total_sessions,
        summary.failed_sessions,
        summary.failure_rate,
        mode,
        cmd.output_dir.display()
    );
    Ok(())
}

/// Drop attempts below `minimum` or with an unknown version.
fn retain_current_versions(attempts: &mut Vec<SessionAttempt>, minimum: i64) {
    let before = attempts.len();
    attempts.retain(|a| a.meets_version(minimum));
    let dropped = before - attempts.len();
    if dropped > 0 {
        tracing::info!(dropped, kept = attempts.len(), minimum_version = minimum, "sessions below minimum version skipped");
    }
}

fn run_capacity(cmd: CapacityArgs, config: &MmtraceConfig) -> Result<()> {
    let text = read_input(&cmd.input)?;
    let rows =
        ingest::read_table_rows(&text).with_context(|| format!("parsing game-user table {}", cmd.input.display()))?;

    let report = CapacityReport::build(&rows, &config.analysis);
    report::write_capacity_outputs(&cmd.output_dir, &report)?;

    println!(
        "{} failed games, {:.1}% fishy: {} ({}). Reports in {}",
        report.failed_games,
        report.fishy_pct,
        report.health,
        report.health.summary(),
        cmd.output_dir.display()
    );
    Ok(())
}
