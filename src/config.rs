use std::net::SocketAddr;
use std::time::Duration;

use crate::core_state::UserRole;

/// Application-level constants
pub const APP_NAME: &str = "TriageHub";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "triage_hub_lib=info,tower_http=warn"
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("{0} is required when TRIAGE_BACKEND=remote")]
    Missing(&'static str),
}

/// Which classifier serves `POST /api/triage`. Fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    LocalHeuristic,
    Remote {
        base_url: String,
        api_key: Option<String>,
        timeout: Duration,
    },
}

/// A bearer token accepted by the API, with the role it grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiToken {
    pub token: String,
    pub role: UserRole,
    pub name: String,
}

/// Runtime configuration, read once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    pub bind_addr: SocketAddr,
    pub backend: BackendKind,
    /// Serve a labelled local result when the remote backend is unavailable.
    pub fallback_to_local: bool,
    pub api_tokens: Vec<ApiToken>,
    pub cors_origins: Vec<String>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8000))),
            backend: BackendKind::LocalHeuristic,
            fallback_to_local: false,
            api_tokens: Vec::new(),
            cors_origins: split_list(DEFAULT_CORS_ORIGINS),
        }
    }
}

impl TriageConfig {
    /// Build the configuration from `TRIAGE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("TRIAGE_BIND_ADDR") {
            config.bind_addr = addr.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "TRIAGE_BIND_ADDR",
                reason: format!("{e}"),
            })?;
        }

        let backend = lookup("TRIAGE_BACKEND").unwrap_or_else(|| "local".into());
        config.backend = match backend.trim().to_ascii_lowercase().as_str() {
            "local" | "local-heuristic" => BackendKind::LocalHeuristic,
            "remote" => {
                let base_url = lookup("TRIAGE_REMOTE_URL")
                    .filter(|u| !u.trim().is_empty())
                    .ok_or(ConfigError::Missing("TRIAGE_REMOTE_URL"))?;
                let timeout_secs = match lookup("TRIAGE_REMOTE_TIMEOUT_SECS") {
                    Some(raw) => parse_timeout(&raw)?,
                    None => DEFAULT_REMOTE_TIMEOUT_SECS,
                };
                BackendKind::Remote {
                    base_url: base_url.trim().trim_end_matches('/').to_string(),
                    api_key: lookup("TRIAGE_REMOTE_API_KEY").filter(|k| !k.is_empty()),
                    timeout: Duration::from_secs(timeout_secs),
                }
            }
            other => {
                return Err(ConfigError::Invalid {
                    key: "TRIAGE_BACKEND",
                    reason: format!("expected 'local' or 'remote', got '{other}'"),
                })
            }
        };

        if let Some(raw) = lookup("TRIAGE_FALLBACK_LOCAL") {
            config.fallback_to_local = parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                key: "TRIAGE_FALLBACK_LOCAL",
                reason: format!("expected true/false, got '{raw}'"),
            })?;
        }

        if let Some(raw) = lookup("TRIAGE_API_TOKENS") {
            config.api_tokens = parse_tokens(&raw)?;
        }

        if let Some(raw) = lookup("TRIAGE_CORS_ORIGINS") {
            config.cors_origins = split_list(&raw);
        }

        Ok(config)
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::Invalid {
            key: "TRIAGE_REMOTE_TIMEOUT_SECS",
            reason: format!("expected a positive number of seconds, got '{raw}'"),
        }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse `token:ROLE[:name]` entries separated by commas.
fn parse_tokens(raw: &str) -> Result<Vec<ApiToken>, ConfigError> {
    split_list(raw)
        .into_iter()
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            let token = parts.next().unwrap_or_default().trim().to_string();
            let role = parts.next().map(str::trim).unwrap_or_default();
            let invalid = |reason: String| ConfigError::Invalid {
                key: "TRIAGE_API_TOKENS",
                reason,
            };
            if token.is_empty() {
                return Err(invalid("empty token".into()));
            }
            let role: UserRole = role
                .parse()
                .map_err(|_| invalid(format!("unknown role '{role}'")))?;
            let name = parts
                .next()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| role.to_string().to_lowercase());
            Ok(ApiToken { token, role, name })
        })
        .collect()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = TriageConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8000");
        assert_eq!(config.backend, BackendKind::LocalHeuristic);
        assert!(!config.fallback_to_local);
        assert!(config.api_tokens.is_empty());
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    fn remote_backend_requires_url() {
        let err = TriageConfig::from_lookup(lookup_from(&[("TRIAGE_BACKEND", "remote")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("TRIAGE_REMOTE_URL"));
    }

    #[test]
    fn remote_backend_parsed() {
        let config = TriageConfig::from_lookup(lookup_from(&[
            ("TRIAGE_BACKEND", "Remote"),
            ("TRIAGE_REMOTE_URL", "http://models.internal:9000/"),
            ("TRIAGE_REMOTE_API_KEY", "k-123"),
            ("TRIAGE_REMOTE_TIMEOUT_SECS", "3"),
            ("TRIAGE_FALLBACK_LOCAL", "yes"),
        ]))
        .unwrap();

        assert_eq!(
            config.backend,
            BackendKind::Remote {
                base_url: "http://models.internal:9000".into(),
                api_key: Some("k-123".into()),
                timeout: Duration::from_secs(3),
            }
        );
        assert!(config.fallback_to_local);
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = TriageConfig::from_lookup(lookup_from(&[
            ("TRIAGE_BACKEND", "remote"),
            ("TRIAGE_REMOTE_URL", "http://x"),
            ("TRIAGE_REMOTE_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TRIAGE_REMOTE_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn unknown_backend_rejected() {
        let err = TriageConfig::from_lookup(lookup_from(&[("TRIAGE_BACKEND", "xgboost")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TRIAGE_BACKEND", .. }));
    }

    #[test]
    fn tokens_parsed_with_roles() {
        let config = TriageConfig::from_lookup(lookup_from(&[(
            "TRIAGE_API_TOKENS",
            "abc:DOCTOR:Dr Grey, def:patient",
        )]))
        .unwrap();

        assert_eq!(config.api_tokens.len(), 2);
        assert_eq!(config.api_tokens[0].role, UserRole::Doctor);
        assert_eq!(config.api_tokens[0].name, "Dr Grey");
        assert_eq!(config.api_tokens[1].role, UserRole::Patient);
        assert_eq!(config.api_tokens[1].name, "patient");
    }

    #[test]
    fn token_with_unknown_role_rejected() {
        let err = TriageConfig::from_lookup(lookup_from(&[("TRIAGE_API_TOKENS", "abc:NURSE")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TRIAGE_API_TOKENS", .. }));
    }

    #[test]
    fn invalid_bind_addr_rejected() {
        let err = TriageConfig::from_lookup(lookup_from(&[("TRIAGE_BIND_ADDR", "localhost")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TRIAGE_BIND_ADDR", .. }));
    }

    #[test]
    fn app_name_is_triage_hub() {
        assert_eq!(APP_NAME, "TriageHub");
    }
}
