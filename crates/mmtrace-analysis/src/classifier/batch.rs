//! Parallel batch classification.
//!
//! Each attempt is classified independently with no shared mutable state, so
//! the batch is a plain rayon map. Output order matches input order.

use mmtrace_core::{ClassifyError, EvaluationMode, SessionAttempt};
use rayon::prelude::*;

use super::classification::FailureRecord;
use super::engine::FailureClassifier;

impl FailureClassifier {
    /// Classify every attempt. Fails fast on the first contract violation.
    pub fn classify_batch(
        &self,
        attempts: &[SessionAttempt],
        mode: EvaluationMode,
    ) -> Result<Vec<FailureRecord>, ClassifyError> {
        tracing::info!(sessions = attempts.len(), %mode, "classifying batch");
        let records = attempts
            .par_iter()
            .map(|attempt| self.classify_attempt(attempt, mode))
            .collect::<Result<Vec<_>, _>>()?;
        let failed = records.iter().filter(|r| r.classification.is_failure()).count();
        tracing::info!(sessions = records.len(), failed, "batch classified");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_preserves_input_order() {
        let classifier = FailureClassifier::with_defaults().unwrap();
        let attempts: Vec<SessionAttempt> = (0..64).map(|i| SessionAttempt::new(format!("s{i}"))).collect();
        let records = classifier.classify_batch(&attempts, EvaluationMode::Independent).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.classification.session_id()).collect();
        let expected: Vec<String> = (0..64).map(|i| format!("s{i}")).collect();
        assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn batch_rejects_empty_session_id() {
        let classifier = FailureClassifier::with_defaults().unwrap();
        let attempts = vec![SessionAttempt::new("ok"), SessionAttempt::new("")];
        assert!(classifier.classify_batch(&attempts, EvaluationMode::Independent).is_err());
    }
}
