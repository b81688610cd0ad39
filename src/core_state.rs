//! Shared application state.
//!
//! `CoreState` is built once at startup from `TriageConfig` and shared by
//! `Arc` with every request handler. It owns the selected triage backend,
//! the bearer-token registry and the triage ledger.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::TriageConfig;
use crate::stats::TriageLedger;
use crate::triage::{build_backend, LocalHeuristicBackend, TriageBackend, TriageError};

// ═══════════════════════════════════════════════════════════
// Roles and sessions
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRole {
    Doctor,
    Patient,
    Admin,
}

impl UserRole {
    /// Doctors and admins may see aggregate triage data.
    pub fn is_clinical(&self) -> bool {
        matches!(self, Self::Doctor | Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctor => write!(f, "DOCTOR"),
            Self::Patient => write!(f, "PATIENT"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DOCTOR" => Ok(Self::Doctor),
            "PATIENT" => Ok(Self::Patient),
            "ADMIN" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// The authenticated caller behind a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub role: UserRole,
}

/// Bearer tokens accepted by the API, stored as SHA-256 hashes.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<[u8; 32], Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token. Re-registering the same token replaces its session.
    pub fn register(&mut self, token: &str, name: &str, role: UserRole) -> Session {
        let session = Session {
            user_id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            role,
        };
        self.sessions.insert(hash_token(token), session.clone());
        session
    }

    /// Issue a fresh random token for a new session.
    pub fn issue(&mut self, name: &str, role: UserRole) -> String {
        let token = generate_token();
        self.register(&token, name, role);
        token
    }

    pub fn validate(&self, token: &str) -> Option<Session> {
        self.sessions.get(&hash_token(token)).cloned()
    }

    #[cfg(test)]
    pub fn revoke(&mut self, token: &str) -> bool {
        self.sessions.remove(&hash_token(token)).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Hash a bearer token string using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    pub config: TriageConfig,
    backend: Arc<dyn TriageBackend>,
    /// Used when the configured backend fails and fallback is enabled.
    local: LocalHeuristicBackend,
    sessions: RwLock<SessionRegistry>,
    ledger: Mutex<TriageLedger>,
}

impl CoreState {
    /// Build state from configuration, constructing the selected backend
    /// and registering the configured API tokens.
    pub fn from_config(config: TriageConfig) -> Result<Self, TriageError> {
        let backend = build_backend(&config.backend)?;
        Ok(Self::with_backend(config, backend))
    }

    /// Build state around an already-constructed backend.
    pub fn with_backend(config: TriageConfig, backend: Arc<dyn TriageBackend>) -> Self {
        let mut sessions = SessionRegistry::new();
        for entry in &config.api_tokens {
            sessions.register(&entry.token, &entry.name, entry.role);
        }

        tracing::info!(
            backend = backend.name(),
            fallback_to_local = config.fallback_to_local,
            tokens = sessions.len(),
            "Triage core initialised"
        );

        Self {
            config,
            backend,
            local: LocalHeuristicBackend,
            sessions: RwLock::new(sessions),
            ledger: Mutex::new(TriageLedger::new()),
        }
    }

    pub fn backend(&self) -> Arc<dyn TriageBackend> {
        Arc::clone(&self.backend)
    }

    pub fn local_backend(&self) -> LocalHeuristicBackend {
        self.local
    }

    pub fn read_sessions(&self) -> Result<RwLockReadGuard<'_, SessionRegistry>, CoreError> {
        self.sessions.read().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn write_sessions(&self) -> Result<RwLockWriteGuard<'_, SessionRegistry>, CoreError> {
        self.sessions.write().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn ledger(&self) -> Result<MutexGuard<'_, TriageLedger>, CoreError> {
        self.ledger.lock().map_err(|_| CoreError::LockPoisoned)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
}
