//! CSV ingest for session tables and game-user tables.

use mmtrace_analysis::capacity::parse_capacity;
use mmtrace_analysis::games::TableRow;
use mmtrace_core::{IngestError, MmtraceErrorCode, SessionAttempt};
use rustc_hash::FxHashSet;

use crate::csv::{parse_record, split_records};

const SESSION_ID: &[&str] = &["session_id", "registrationid", "registration_id"];
const APP_VERSION: &[&str] = &["app_version", "appversion", "version"];
const GAME_ID: &[&str] = &["game_id", "gameid"];
const USER_ID: &[&str] = &["user_id", "userid", "uid"];
const REASON: &[&str] = &["reason"];

/// Parsed CSV: lower-cased headers and rows that match the header width.
#[derive(Debug)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse CSV text. Malformed rows are skipped with a warning.
    pub fn parse(text: &str) -> Result<Self, IngestError> {
        let mut records = split_records(text).into_iter();
        let (_, header_line) = records.next().ok_or(IngestError::Empty)?;
        let headers: Vec<String> = parse_record(header_line.trim_start_matches('\u{feff}'))
            .ok_or(IngestError::MalformedRow { line: 1 })?
            .into_iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();

        let mut rows = Vec::new();
        for (line, record) in records {
            match parse_record(&record) {
                Some(fields) if fields.len() == headers.len() => rows.push(fields),
                _ => {
                    let err = IngestError::MalformedRow { line };
                    tracing::warn!(code = err.error_code(), "{err}, skipped");
                }
            }
        }
        Ok(Self { headers, rows })
    }

    /// Index of the first header matching one of `names`.
    pub fn column(&self, names: &[&str]) -> Option<usize> {
        names
            .iter()
            .find_map(|name| self.headers.iter().position(|h| h == name))
    }

    pub fn require(&self, names: &[&str]) -> Result<usize, IngestError> {
        self.column(names).ok_or_else(|| IngestError::MissingColumn {
            column: names.join("|"),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

fn cell(row: &[String], idx: Option<usize>) -> Option<String> {
    idx.map(|i| row[i].trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// App versions may be exported as floats (`448.0`).
fn parse_version(raw: &str) -> Option<i64> {
    parse_capacity(raw)
}

/// Session attempts from a session table. Duplicate ids keep the first row.
pub fn read_sessions(text: &str) -> Result<Vec<SessionAttempt>, IngestError> {
    let table = CsvTable::parse(text)?;
    let id_col = table.require(SESSION_ID)?;
    let version_col = table.require(APP_VERSION)?;
    let created_col = table.column(&["created_at"]);
    let capacity_col = table.column(&["capacity"]);
    let participants_col = table.column(&["participant_count", "participants"]);

    let mut seen = FxHashSet::default();
    let mut attempts = Vec::with_capacity(table.len());
    for row in &table.rows {
        let Some(session_id) = cell(row, Some(id_col)) else {
            continue;
        };
        if !seen.insert(session_id.clone()) {
            tracing::debug!(session_id = %session_id, "duplicate session row skipped");
            continue;
        }
        attempts.push(SessionAttempt {
            app_version: cell(row, Some(version_col)).and_then(|v| parse_version(&v)),
            created_at: cell(row, created_col),
            capacity: cell(row, capacity_col).and_then(|v| parse_capacity(&v)),
            participant_count: cell(row, participants_col).and_then(|v| v.parse().ok()),
            log_text: None,
            session_id,
        });
    }
    tracing::info!(sessions = attempts.len(), "session table loaded");
    Ok(attempts)
}

/// Rows of a game-user table.
pub fn read_table_rows(text: &str) -> Result<Vec<TableRow>, IngestError> {
    let table = CsvTable::parse(text)?;
    let game_col = table.require(GAME_ID)?;
    let user_col = table.require(USER_ID)?;
    let reason_col = table.require(REASON)?;
    let capacity_col = table.column(&["capacity"]);
    let created_col = table.column(&["created_at"]);
    let updated_col = table.column(&["updated_at"]);
    let created_by_col = table.column(&["created_by"]);
    let table_col = table.column(&["table_id", "tableid"]);

    let rows: Vec<TableRow> = table
        .rows
        .iter()
        .map(|row| TableRow {
            game_id: cell(row, Some(game_col)).unwrap_or_default(),
            user_id: cell(row, Some(user_col)).unwrap_or_default(),
            reason: cell(row, Some(reason_col)).unwrap_or_default(),
            capacity: cell(row, capacity_col).and_then(|v| parse_capacity(&v)),
            created_at: cell(row, created_col),
            updated_at: cell(row, updated_col),
            created_by: cell(row, created_by_col),
            table_id: cell(row, table_col),
        })
        .collect();
    tracing::info!(rows = rows.len(), "game-user table loaded");
    Ok(rows)
}
