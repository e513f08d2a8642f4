use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use mmtrace_core::EvaluationMode;

/// Command-line arguments for `mmtrace`.
#[derive(Debug, Parser)]
#[command(
    name = "mmtrace",
    about = "Classify failed matchmaking attempts from client logs and game tables",
    version
)]
pub struct Args {
    /// TOML config with marker and threshold overrides
    #[arg(long, global = true, env = "MMTRACE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log more (repeat for trace output)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify sessions from their client logs
    Sessions(SessionsArgs),
    /// Classify failed games by participants and capacity
    Capacity(CapacityArgs),
}

#[derive(Debug, ClapArgs)]
pub struct SessionsArgs {
    /// CSV with session_id (or registrationId) and app_version columns
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Directory searched recursively for log files
    #[arg(short = 'l', long)]
    pub logs: PathBuf,

    /// Evaluation mode: independent or short-circuit (default from config)
    #[arg(short = 'm', long)]
    pub mode: Option<EvaluationMode>,

    /// Only sessions at or above this app version are analysed
    #[arg(long, env = "MINIMUM_VERSION_ANALYSIS")]
    pub minimum_version: Option<i64>,

    /// Analyse every session regardless of app version
    #[arg(long)]
    pub all_versions: bool,

    /// Where reports are written
    #[arg(short = 'o', long, default_value = "./analysis_output")]
    pub output_dir: PathBuf,
}

#[derive(Debug, ClapArgs)]
pub struct CapacityArgs {
    /// CSV export of the game-user table
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Where reports are written
    #[arg(short = 'o', long, default_value = "./capacity_output")]
    pub output_dir: PathBuf,
}

impl Args {
    /// Tracing filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
