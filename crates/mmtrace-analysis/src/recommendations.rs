//! Remediation hints per primary failure point.

use mmtrace_core::{FailurePoint, Stage};

use crate::classifier::FailureClassification;

/// Fixed hints for the session's primary failure point. Successful sessions
/// and unknown matchmaking failures get none.
pub fn recommendations_for(classification: &FailureClassification) -> Vec<String> {
    let hints: &[&str] = match classification.failure_point() {
        FailurePoint::Registration => &[
            "Check user wallet balance and session validity",
            "Verify tournament availability and user eligibility",
            "Review registration API error responses",
        ],
        FailurePoint::TableAssignment => &[
            "Investigate game server allocation service health",
            "Check available game server pool capacity",
            "Review backend infrastructure scaling",
        ],
        FailurePoint::SocketConnection => &[
            "Test network connectivity to game servers",
            "Check specific game server instance health",
            "Verify firewall and load balancer configurations",
        ],
        FailurePoint::QueueEntry => &[
            "Check that the client emits the queue entry event after connecting",
            "Review gameplay socket event handling on the client",
        ],
        FailurePoint::MatchmakingLogic => &[
            "Investigate game server matchmaking algorithm",
            "Check for race conditions or deadlocks",
            "Review player liquidity for the time period",
        ],
        FailurePoint::ServerUnresponsive => &[
            "Check game server responsiveness and health",
            "Investigate potential server crashes or hangs",
            "Review server resource utilization",
        ],
        FailurePoint::MatchmakingUnknown | FailurePoint::NoFailure => &[],
    };

    let mut out: Vec<String> = hints.iter().map(|h| h.to_string()).collect();
    if classification.failure_point() == FailurePoint::MatchmakingLogic {
        let pod_ip = classification
            .detail(Stage::TableAssignment, "pod_ip")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        out.push(format!("Examine specific pod IP: {pod_ip}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FailureClassifier;
    use mmtrace_core::EvaluationMode;

    #[test]
    fn registration_failure_hints() {
        let c = FailureClassifier::with_defaults().unwrap();
        let result = c.classify_session("", "s", EvaluationMode::Independent).unwrap();
        let hints = recommendations_for(&result);
        assert_eq!(hints.len(), 3);
        assert!(hints[0].contains("wallet"));
    }
}
