pub mod api;
pub mod config;
pub mod core_state;
pub mod quick_fix;
pub mod stats;
pub mod triage;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, TriageConfig};
use crate::core_state::{CoreState, UserRole};
use crate::triage::TriageError;

/// Startup failures. Anything after the server is listening is logged, not returned.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Triage backend error: {0}")]
    Backend(#[from] TriageError),
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("Server error: {0}")]
    Server(String),
}

pub fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = TriageConfig::from_env()?;
    let bind_addr = config.bind_addr;

    // The remote backend owns a blocking HTTP client, which must be built
    // and dropped outside the async runtime.
    let core = Arc::new(CoreState::from_config(config)?);
    if let Some(token) = bootstrap_token(&core)? {
        eprintln!("Temporary DOCTOR token (valid until exit): {token}");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(serve(Arc::clone(&core), bind_addr));

    drop(runtime);
    drop(core);
    result
}

async fn serve(core: Arc<CoreState>, addr: std::net::SocketAddr) -> Result<(), StartupError> {
    let mut server = api::server::start_triage_server(core, addr)
        .await
        .map_err(StartupError::Server)?;

    tracing::info!(
        session_id = %server.session.session_id,
        addr = %server.session.server_addr,
        "Triage API listening"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }

    server.shutdown();
    server.stopped().await;
    Ok(())
}

/// Without configured tokens nobody could call the API, so issue a
/// one-off doctor token for this process. The token is returned for the
/// operator and never passes through the log pipeline.
fn bootstrap_token(core: &CoreState) -> Result<Option<String>, StartupError> {
    let mut sessions = core
        .write_sessions()
        .map_err(|e| StartupError::Server(e.to_string()))?;
    if !sessions.is_empty() {
        return Ok(None);
    }
    let token = sessions.issue("bootstrap", UserRole::Doctor);
    tracing::warn!(
        "TRIAGE_API_TOKENS is not set; issued a temporary DOCTOR token for this process (printed to stderr)"
    );
    Ok(Some(token))
}
