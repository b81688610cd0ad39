use std::sync::Arc;

use super::classify::classify;
use super::remote::RemoteTriageBackend;
use super::types::{PatientAssessment, RiskAssessmentResult};
use super::TriageError;
use crate::config::BackendKind;

pub const LOCAL_HEURISTIC: &str = "local-heuristic";
pub const REMOTE_SERVICE: &str = "remote-service";

/// Source of triage classifications.
///
/// Implementations may block (remote calls); async callers should run
/// `classify` on a blocking thread.
pub trait TriageBackend: Send + Sync {
    /// Stable label reported to callers as the result source.
    fn name(&self) -> &'static str;

    fn classify(
        &self,
        assessment: &PatientAssessment,
    ) -> Result<RiskAssessmentResult, TriageError>;
}

/// The threshold classifier, run in-process. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalHeuristicBackend;

impl TriageBackend for LocalHeuristicBackend {
    fn name(&self) -> &'static str {
        LOCAL_HEURISTIC
    }

    fn classify(
        &self,
        assessment: &PatientAssessment,
    ) -> Result<RiskAssessmentResult, TriageError> {
        Ok(classify(assessment))
    }
}

/// Build the backend selected by configuration.
///
/// Must be called outside an async context when the remote backend is
/// selected, since it owns a blocking HTTP client.
pub fn build_backend(kind: &BackendKind) -> Result<Arc<dyn TriageBackend>, TriageError> {
    match kind {
        BackendKind::LocalHeuristic => Ok(Arc::new(LocalHeuristicBackend)),
        BackendKind::Remote {
            base_url,
            api_key,
            timeout,
        } => {
            let remote = RemoteTriageBackend::new(base_url, api_key.clone(), *timeout)?;
            Ok(Arc::new(remote))
        }
    }
}

/// Backend that always reports the service as unavailable.
#[cfg(test)]
pub struct UnavailableBackend;

#[cfg(test)]
impl TriageBackend for UnavailableBackend {
    fn name(&self) -> &'static str {
        REMOTE_SERVICE
    }

    fn classify(
        &self,
        _assessment: &PatientAssessment,
    ) -> Result<RiskAssessmentResult, TriageError> {
        Err(TriageError::ServiceUnavailable("connection refused".into()))
    }
}

/// Local heuristic that counts how often it is asked to classify.
#[cfg(test)]
#[derive(Default)]
pub struct CountingBackend {
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl CountingBackend {
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl TriageBackend for CountingBackend {
    fn name(&self) -> &'static str {
        LOCAL_HEURISTIC
    }

    fn classify(
        &self,
        assessment: &PatientAssessment,
    ) -> Result<RiskAssessmentResult, TriageError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(classify(assessment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::types::{Gender, RiskLevel, Vitals};
    use std::collections::BTreeSet;

    fn assessment() -> PatientAssessment {
        PatientAssessment {
            age: 70,
            gender: Gender::Female,
            vitals: Vitals {
                spo2: 88.0,
                ..Vitals::default()
            },
            symptoms: BTreeSet::from(["shortness of breath".to_string()]),
            pre_existing_conditions: BTreeSet::new(),
        }
    }

    #[test]
    fn local_backend_matches_classifier() {
        let backend = LocalHeuristicBackend;
        let result = backend.classify(&assessment()).unwrap();
        assert_eq!(result, classify(&assessment()));
        assert_eq!(result.risk_level, RiskLevel::Critical);
        assert_eq!(backend.name(), "local-heuristic");
    }

    #[test]
    fn build_local_backend_from_config() {
        let backend = build_backend(&BackendKind::LocalHeuristic).unwrap();
        assert_eq!(backend.name(), LOCAL_HEURISTIC);
    }

    #[test]
    fn build_remote_backend_from_config() {
        let backend = build_backend(&BackendKind::Remote {
            base_url: "http://127.0.0.1:9".into(),
            api_key: None,
            timeout: std::time::Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(backend.name(), REMOTE_SERVICE);
    }

    #[test]
    fn unavailable_backend_is_a_backend_failure() {
        let err = UnavailableBackend.classify(&assessment()).unwrap_err();
        assert!(err.is_backend_failure());
    }
}
