//! API endpoint handlers.
//!
//! Handlers stay thin: they validate, delegate to the triage engine or
//! quick-fix classifier, and shape the JSON response.

pub mod health;
pub mod quick_fix;
pub mod stats;
pub mod symptoms;
pub mod triage;

use axum::extract::rejection::JsonRejection;

use crate::api::error::ApiError;

/// Malformed or mistyped bodies are reported as validation failures.
pub(crate) fn body_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(rejection.body_text())
}
