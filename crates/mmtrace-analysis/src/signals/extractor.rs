//! Marker search over raw log text.
//!
//! Each configured marker compiles to a regex template: its anchors are escaped
//! and joined by a greedy `.*`, with `{session_id}` left in place until match
//! time. `Span::Document` markers let `.` cross line breaks so a session id
//! attribute may sit several lines below the event that carries it.

use std::collections::BTreeMap;

use mmtrace_core::config::{CaptureSpec, MarkerSpec, MarkerTable, Span, SESSION_PLACEHOLDER};
use mmtrace_core::{ClassifyError, Stage};
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// One marker occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalMatch {
    /// Byte offset of the first anchor.
    pub start: usize,
    /// Byte offset just past the last anchor.
    pub end: usize,
    /// 1-based line of `start`.
    pub line: usize,
}

impl SignalMatch {
    pub fn text<'a>(&self, log_text: &'a str) -> &'a str {
        &log_text[self.start..self.end]
    }
}

/// Everything the extractor found for one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSignals {
    pub request: Vec<SignalMatch>,
    pub success: Vec<SignalMatch>,
    /// `None` when the stage has no such role configured.
    pub explicit_failure: Option<Vec<SignalMatch>>,
    pub timeout: Option<Vec<SignalMatch>>,
}

/// A marker with its regex template prepared.
#[derive(Debug, Clone)]
struct CompiledMarker {
    /// Regex source with the raw placeholder still in it.
    template: String,
    span: Span,
    /// Pre-built regex for markers that do not mention the session.
    unbound: Option<Regex>,
    /// Cheap pre-filter: the longest literal anchor piece.
    needle: String,
}

impl CompiledMarker {
    fn compile(stage: Stage, role: &'static str, spec: &MarkerSpec) -> Result<Self, ClassifyError> {
        let template = spec
            .anchors
            .iter()
            .map(|anchor| escape_anchor(anchor))
            .collect::<Vec<_>>()
            .join(".*");

        let needle = spec
            .anchors
            .iter()
            .flat_map(|a| a.split(SESSION_PLACEHOLDER))
            .max_by_key(|piece| piece.len())
            .unwrap_or_default()
            .to_string();

        let invalid = |e: regex::Error| ClassifyError::InvalidMarker {
            stage,
            role,
            message: e.to_string(),
        };

        let unbound = if spec.is_session_bound() {
            // Compile once with a stand-in id so broken templates fail at construction.
            build_regex(&bind(&template, "session"), spec.span).map_err(invalid)?;
            None
        } else {
            Some(build_regex(&template, spec.span).map_err(invalid)?)
        };

        Ok(Self {
            template,
            span: spec.span,
            unbound,
            needle,
        })
    }

    fn find_all(&self, log_text: &str, session_id: &str) -> Vec<SignalMatch> {
        if !self.needle.is_empty() && !log_text.contains(self.needle.as_str()) {
            return Vec::new();
        }
        let bound;
        let regex = match &self.unbound {
            Some(r) => r,
            None => match build_regex(&bind(&self.template, session_id), self.span) {
                Ok(r) => {
                    bound = r;
                    &bound
                }
                Err(e) => {
                    // Escaped literals always compile; only a size limit can land here.
                    tracing::warn!(error = %e, "marker regex rejected for session {session_id}");
                    return Vec::new();
                }
            },
        };
        collect_matches(regex, log_text)
    }
}

/// A named capture with its template prepared.
#[derive(Debug, Clone)]
struct CompiledCapture {
    name: String,
    template: String,
    numeric: bool,
    /// Precompiled when the pattern does not mention the session id.
    unbound: Option<Regex>,
}

/// Compiled marker set for all four stages.
#[derive(Debug, Clone)]
pub struct SignalExtractor {
    stages: Vec<CompiledStage>,
}

#[derive(Debug, Clone)]
struct CompiledStage {
    request: CompiledMarker,
    success: CompiledMarker,
    explicit_failure: Option<CompiledMarker>,
    timeout: Option<CompiledMarker>,
    captures: Vec<CompiledCapture>,
}

impl SignalExtractor {
    /// Compile every marker in the table. Fails on the first marker that
    /// cannot be turned into a regex.
    pub fn new(table: &MarkerTable) -> Result<Self, ClassifyError> {
        let mut stages = Vec::with_capacity(Stage::ALL.len());
        for stage in Stage::ALL {
            let markers = table.for_stage(stage);
            let optional = |role, spec: &Option<MarkerSpec>| {
                spec.as_ref()
                    .map(|s| CompiledMarker::compile(stage, role, s))
                    .transpose()
            };
            stages.push(CompiledStage {
                request: CompiledMarker::compile(stage, "request", &markers.request)?,
                success: CompiledMarker::compile(stage, "success", &markers.success)?,
                explicit_failure: optional("explicit_failure", &markers.explicit_failure)?,
                timeout: optional("timeout", &markers.timeout)?,
                captures: markers
                    .captures
                    .iter()
                    .map(|c| compile_capture(stage, c))
                    .collect::<Result<_, _>>()?,
            });
        }
        Ok(Self { stages })
    }

    /// Find every configured role of `stage` in the log.
    pub fn extract(&self, stage: Stage, log_text: &str, session_id: &str) -> StageSignals {
        let compiled = &self.stages[stage.ordinal()];
        StageSignals {
            request: compiled.request.find_all(log_text, session_id),
            success: compiled.success.find_all(log_text, session_id),
            explicit_failure: compiled
                .explicit_failure
                .as_ref()
                .map(|m| m.find_all(log_text, session_id)),
            timeout: compiled.timeout.as_ref().map(|m| m.find_all(log_text, session_id)),
        }
    }

    /// Evaluate the named captures of `stage`. Captures that do not match are omitted.
    pub fn captures(&self, stage: Stage, log_text: &str, session_id: &str) -> BTreeMap<String, serde_json::Value> {
        let mut values = BTreeMap::new();
        for capture in &self.stages[stage.ordinal()].captures {
            let bound;
            let regex = match &capture.unbound {
                Some(r) => r,
                None => match Regex::new(&bind(&capture.template, session_id)) {
                    Ok(r) => {
                        bound = r;
                        &bound
                    }
                    Err(e) => {
                        tracing::warn!(capture = %capture.name, error = %e, "capture regex rejected");
                        continue;
                    }
                },
            };
            let Some(raw) = regex
                .captures(log_text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
            else {
                continue;
            };
            let value = if capture.numeric {
                match raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                    Some(n) => serde_json::Value::Number(n),
                    None => serde_json::Value::String(raw.to_string()),
                }
            } else {
                serde_json::Value::String(raw.to_string())
            };
            values.insert(capture.name.clone(), value);
        }
        values
    }
}

fn compile_capture(stage: Stage, spec: &CaptureSpec) -> Result<CompiledCapture, ClassifyError> {
    let regex = Regex::new(&bind(&spec.pattern, "session")).map_err(|e| ClassifyError::InvalidMarker {
        stage,
        role: "capture",
        message: format!("{}: {e}", spec.name),
    })?;
    if regex.captures_len() < 2 {
        return Err(ClassifyError::InvalidMarker {
            stage,
            role: "capture",
            message: format!("{}: pattern has no capture group", spec.name),
        });
    }
    Ok(CompiledCapture {
        name: spec.name.clone(),
        template: spec.pattern.clone(),
        numeric: spec.numeric,
        unbound: (!spec.pattern.contains(SESSION_PLACEHOLDER)).then_some(regex),
    })
}

/// Escape an anchor as a literal, keeping the session placeholder intact.
fn escape_anchor(anchor: &str) -> String {
    anchor
        .split(SESSION_PLACEHOLDER)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(SESSION_PLACEHOLDER)
}

fn bind(template: &str, session_id: &str) -> String {
    template.replace(SESSION_PLACEHOLDER, &regex::escape(session_id))
}

fn build_regex(source: &str, span: Span) -> Result<Regex, regex::Error> {
    RegexBuilder::new(source)
        .dot_matches_new_line(span == Span::Document)
        .build()
}

fn collect_matches(regex: &Regex, log_text: &str) -> Vec<SignalMatch> {
    let mut line = 1;
    let mut scanned = 0;
    regex
        .find_iter(log_text)
        .map(|m| {
            line += log_text[scanned..m.start()].matches('\n').count();
            scanned = m.start();
            SignalMatch {
                start: m.start(),
                end: m.end(),
                line,
            }
        })
        .collect()
}
