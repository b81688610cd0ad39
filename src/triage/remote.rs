use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::backend::{TriageBackend, REMOTE_SERVICE};
use super::explain::rank_factors;
use super::route::route_department;
use super::types::{ContributingFactor, Gender, PatientAssessment, RiskAssessmentResult, RiskLevel};
use super::TriageError;

/// Request body for `POST {base_url}/api/triage`.
#[derive(Debug, Serialize)]
struct RemoteTriageRequest<'a> {
    age: u32,
    gender: Gender,
    symptoms: Vec<&'a str>,
    bp_systolic: u32,
    bp_diastolic: u32,
    heart_rate: u32,
    temperature: f64,
    spo2: f64,
    pre_existing: Vec<&'a str>,
}

impl<'a> From<&'a PatientAssessment> for RemoteTriageRequest<'a> {
    fn from(a: &'a PatientAssessment) -> Self {
        Self {
            age: a.age,
            gender: a.gender,
            symptoms: a.symptoms.iter().map(String::as_str).collect(),
            bp_systolic: a.vitals.bp_systolic,
            bp_diastolic: a.vitals.bp_diastolic,
            heart_rate: a.vitals.heart_rate,
            temperature: a.vitals.temperature,
            spo2: a.vitals.spo2,
            pre_existing: a.pre_existing_conditions.iter().map(String::as_str).collect(),
        }
    }
}

/// Response body from the remote triage service.
#[derive(Debug, Deserialize)]
struct RemoteTriageResponse {
    risk_level: RiskLevel,
    explanation: String,
    confidence: f64,
    department: Option<String>,
    #[serde(default)]
    top_factors: Vec<ContributingFactor>,
    #[serde(default)]
    recommended_actions: Vec<String>,
}

/// HTTP adapter for a remote triage model service.
pub struct RemoteTriageBackend {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl RemoteTriageBackend {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TriageError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| TriageError::ServiceUnavailable(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            timeout,
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl TriageBackend for RemoteTriageBackend {
    fn name(&self) -> &'static str {
        REMOTE_SERVICE
    }

    fn classify(
        &self,
        assessment: &PatientAssessment,
    ) -> Result<RiskAssessmentResult, TriageError> {
        let url = format!("{}/api/triage", self.base_url);
        let mut request = self
            .client
            .post(&url)
            .json(&RemoteTriageRequest::from(assessment));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                TriageError::ServiceUnavailable(format!(
                    "request timed out after {}s",
                    self.timeout.as_secs()
                ))
            } else if e.is_connect() {
                TriageError::ServiceUnavailable(format!("cannot reach {}", self.base_url))
            } else {
                TriageError::ServiceUnavailable(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %url, "Remote triage service error");
            return Err(TriageError::ServiceUnavailable(format!(
                "service returned status {}",
                status.as_u16()
            )));
        }

        let body = response.text().map_err(|e| {
            if e.is_timeout() {
                TriageError::ServiceUnavailable("response timed out".into())
            } else {
                TriageError::MalformedResponse(e.to_string())
            }
        })?;

        parse_response(&body)
    }
}

/// Parse and validate a remote response body.
fn parse_response(body: &str) -> Result<RiskAssessmentResult, TriageError> {
    let parsed: RemoteTriageResponse = serde_json::from_str(body)
        .map_err(|e| TriageError::MalformedResponse(e.to_string()))?;

    if !(0.0..=1.0).contains(&parsed.confidence) {
        return Err(TriageError::MalformedResponse(format!(
            "confidence {} outside [0, 1]",
            parsed.confidence
        )));
    }
    if let Some(bad) = parsed
        .top_factors
        .iter()
        .find(|f| !(0.0..=1.0).contains(&f.contribution))
    {
        return Err(TriageError::MalformedResponse(format!(
            "factor '{}' contribution {} outside [0, 1]",
            bad.feature, bad.contribution
        )));
    }

    let mut top_factors = parsed.top_factors;
    rank_factors(&mut top_factors);

    Ok(RiskAssessmentResult {
        department: parsed
            .department
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| route_department(parsed.risk_level).to_string()),
        risk_level: parsed.risk_level,
        explanation: parsed.explanation,
        confidence: parsed.confidence,
        top_factors,
        recommended_actions: parsed.recommended_actions,
    })
}
