//! Log lookup: find each session's log text in a directory of log files.
//!
//! Every file under the root is scanned once with an Aho-Corasick automaton
//! over all session ids. A session's log text is the concatenation of every
//! file that mentions its id, in path order.

use std::path::{Path, PathBuf};

use aho_corasick::AhoCorasick;
use anyhow::{bail, Context, Result};
use mmtrace_core::SessionAttempt;
use rustc_hash::FxHashMap;

/// Files under `root`, sorted by path. Hidden files are included.
pub fn log_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("log directory {} does not exist", root.display());
    }
    let mut builder = ignore::WalkBuilder::new(root);
    builder.hidden(false).git_ignore(false).git_global(false).git_exclude(false);

    let mut files = Vec::new();
    for entry in builder.build() {
        match entry {
            Ok(entry) if entry.file_type().is_some_and(|t| t.is_file()) => files.push(entry.into_path()),
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, "skipping unreadable log entry"),
        }
    }
    files.sort();
    Ok(files)
}

/// Attach log text to every attempt whose id appears in a file under `root`.
/// Returns the number of attempts that received a log.
pub fn attach_logs(attempts: &mut [SessionAttempt], root: &Path) -> Result<usize> {
    if attempts.is_empty() {
        return Ok(0);
    }
    let files = log_files(root)?;
    tracing::info!(files = files.len(), root = %root.display(), "scanning log directory");

    let ids: Vec<&str> = attempts.iter().map(|a| a.session_id.as_str()).collect();
    let automaton = AhoCorasick::new(&ids).context("building session id matcher")?;

    let mut texts: FxHashMap<usize, String> = FxHashMap::default();
    for path in &files {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable log file");
                continue;
            }
        };
        let text = String::from_utf8_lossy(&bytes);

        let mut mentioned: Vec<usize> = automaton
            .find_overlapping_iter(text.as_ref())
            .map(|m| m.pattern().as_usize())
            .collect();
        mentioned.sort_unstable();
        mentioned.dedup();

        for idx in mentioned {
            let entry = texts.entry(idx).or_default();
            if !entry.is_empty() && !entry.ends_with('\n') {
                entry.push('\n');
            }
            entry.push_str(&text);
        }
    }

    let found = texts.len();
    for (idx, attempt) in attempts.iter_mut().enumerate() {
        match texts.remove(&idx) {
            Some(text) => attempt.log_text = Some(text),
            None => tracing::warn!(session_id = %attempt.session_id, "no log file mentions session"),
        }
    }
    tracing::info!(found, missing = attempts.len() - found, "log lookup finished");
    Ok(found)
}
