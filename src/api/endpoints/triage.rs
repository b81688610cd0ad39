//! Triage endpoint.
//!
//! `POST /api/triage` normalizes the form, classifies it through the
//! configured backend, and records the outcome in the ledger. When the
//! backend fails and local fallback is enabled, the heuristic result is
//! served instead and labelled as a fallback.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::endpoints::body_rejection;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, CallerContext};
use crate::triage::{
    normalize, ContributingFactor, PatientAssessment, RawTriageForm, RiskAssessmentResult,
    RiskLevel, TriageBackend, TriageError, MAX_SURFACED_ACTIONS,
};

#[derive(Debug, Serialize)]
pub struct TriageResponse {
    pub risk_level: RiskLevel,
    pub explanation: String,
    pub confidence: f64,
    pub department: String,
    pub top_factors: Vec<ContributingFactor>,
    pub recommended_actions: Vec<String>,
    /// Name of the backend that produced the result.
    pub source: &'static str,
    pub fallback: bool,
}

impl TriageResponse {
    fn new(result: RiskAssessmentResult, source: &'static str, fallback: bool) -> Self {
        let mut recommended_actions = result.recommended_actions;
        recommended_actions.truncate(MAX_SURFACED_ACTIONS);
        Self {
            risk_level: result.risk_level,
            explanation: result.explanation,
            confidence: result.confidence,
            department: result.department,
            top_factors: result.top_factors,
            recommended_actions,
            source,
            fallback,
        }
    }
}

/// `POST /api/triage`: classify a patient's current risk.
pub async fn assess(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<CallerContext>,
    body: Result<Json<RawTriageForm>, JsonRejection>,
) -> Result<Json<TriageResponse>, ApiError> {
    let Json(form) = body.map_err(body_rejection)?;
    let assessment = normalize(form)?;

    let backend = ctx.core.backend();
    let source = backend.name();
    let outcome = run_backend(backend, assessment.clone()).await?;

    let response = match outcome {
        Ok(result) => TriageResponse::new(result, source, false),
        Err(err) if ctx.core.config.fallback_to_local && err.is_backend_failure() => {
            tracing::warn!(
                backend = source,
                error = %err,
                "Triage backend failed, serving local heuristic result"
            );
            let local = ctx.core.local_backend();
            let result = local.classify(&assessment)?;
            TriageResponse::new(result, local.name(), true)
        }
        Err(err) => return Err(err.into()),
    };

    ctx.core
        .ledger()?
        .record(response.risk_level, &response.department, response.fallback);

    tracing::info!(
        user_id = %caller.user_id,
        risk_level = %response.risk_level,
        department = %response.department,
        source = response.source,
        fallback = response.fallback,
        "Triage completed"
    );

    Ok(Json(response))
}

/// Backends may block on network I/O, so classification runs off the
/// async worker threads.
async fn run_backend(
    backend: std::sync::Arc<dyn TriageBackend>,
    assessment: PatientAssessment,
) -> Result<Result<RiskAssessmentResult, TriageError>, ApiError> {
    tokio::task::spawn_blocking(move || backend.classify(&assessment))
        .await
        .map_err(|e| ApiError::Internal(format!("triage task failed: {e}")))
}
