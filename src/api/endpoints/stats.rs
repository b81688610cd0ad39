//! Aggregate triage statistics for clinical dashboards.

use axum::extract::State;
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, CallerContext};
use crate::stats::TriageStats;

/// `GET /api/stats`: doctor and admin only.
pub async fn summary(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<CallerContext>,
) -> Result<Json<TriageStats>, ApiError> {
    if !caller.role.is_clinical() {
        return Err(ApiError::Forbidden);
    }

    let stats = ctx.core.ledger()?.snapshot();
    Ok(Json(stats))
}
