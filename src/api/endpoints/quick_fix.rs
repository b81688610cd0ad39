use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::api::endpoints::body_rejection;
use crate::api::error::ApiError;
use crate::quick_fix::{quick_fix, QuickFixRequest, QuickFixResult};

/// `POST /api/quick-fix`: likely condition and remedy for reported symptoms.
pub async fn suggest(
    body: Result<Json<QuickFixRequest>, JsonRejection>,
) -> Result<Json<QuickFixResult>, ApiError> {
    let Json(request) = body.map_err(body_rejection)?;
    let result = quick_fix(&request)?;
    Ok(Json(result))
}
