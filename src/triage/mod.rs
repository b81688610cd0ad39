//! Triage risk-scoring engine.
//!
//! Normalizer → classifier → {department router, explanation composer}.
//! The classifier is reached through a [`TriageBackend`] so the local
//! heuristic and a remote model service are interchangeable at startup.

pub mod backend;
pub mod classify;
pub mod explain;
pub mod normalize;
pub mod remote;
pub mod route;
pub mod types;

pub use backend::*;
pub use classify::*;
pub use explain::*;
pub use normalize::*;
pub use remote::*;
pub use route::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TriageError {
    /// Rejected before classification; message is shown to the caller verbatim.
    #[error("{0}")]
    Validation(String),

    #[error("Triage service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Malformed triage service response: {0}")]
    MalformedResponse(String),
}

impl TriageError {
    /// True when the failure came from the backend rather than the input.
    pub fn is_backend_failure(&self) -> bool {
        !matches!(self, TriageError::Validation(_))
    }
}
