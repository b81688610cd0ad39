//! HTTP API for the triage service.
//!
//! axum router with bearer-token auth and access logging. Handlers
//! delegate to the triage engine, the quick-fix classifier and the ledger.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;
