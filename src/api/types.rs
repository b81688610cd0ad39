//! Shared types for the API layer.

use std::sync::Arc;

use crate::core_state::{CoreState, Session, UserRole};

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

// ═══════════════════════════════════════════════════════════
// Caller context: injected by auth middleware
// ═══════════════════════════════════════════════════════════

/// Authenticated caller, injected into request extensions by the auth
/// middleware after successful token validation.
#[derive(Debug, Clone)]
pub struct CallerContext {
    pub user_id: String,
    pub name: String,
    pub role: UserRole,
}

impl From<Session> for CallerContext {
    fn from(session: Session) -> Self {
        Self {
            user_id: session.user_id,
            name: session.name,
            role: session.role,
        }
    }
}
