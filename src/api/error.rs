//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::triage::TriageError;

/// Seconds a client should wait before retrying an unavailable backend.
const RETRY_AFTER_SECS: u64 = 30;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Triage service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Invalid upstream response: {0}")]
    BadGateway(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "AUTH_REQUIRED",
                "Authentication required".to_string(),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Your role does not permit this action".to_string(),
            ),
            ApiError::Validation(detail) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                detail.clone(),
            ),
            ApiError::ServiceUnavailable(detail) => {
                tracing::warn!(detail, "Triage backend unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    format!("Triage service is unavailable. Retry in {RETRY_AFTER_SECS}s"),
                )
            }
            ApiError::BadGateway(detail) => {
                tracing::warn!(detail, "Triage backend returned an invalid response");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_INVALID",
                    "Triage service returned an invalid response".to_string(),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };

        let mut response = (status, Json(body)).into_response();
        if matches!(self, ApiError::ServiceUnavailable(_)) {
            if let Ok(val) = axum::http::HeaderValue::from_str(&RETRY_AFTER_SECS.to_string()) {
                response.headers_mut().insert("Retry-After", val);
            }
        }
        response
    }
}

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::Validation(msg) => ApiError::Validation(msg),
            TriageError::ServiceUnavailable(msg) => ApiError::ServiceUnavailable(msg),
            TriageError::MalformedResponse(msg) => ApiError::BadGateway(msg),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
        }
    }
}
