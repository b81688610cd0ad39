//! Access logging middleware.
//!
//! Emits one event per API request with the caller, method, path, status
//! and latency. Runs innermost on protected routes, after auth has
//! injected `CallerContext`.

use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::CallerContext;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let caller = req.extensions().get::<CallerContext>().cloned();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    match caller {
        Some(caller) => tracing::info!(
            user_id = %caller.user_id,
            role = %caller.role,
            method,
            path,
            status,
            elapsed_ms,
            "API access"
        ),
        None => tracing::info!(method, path, status, elapsed_ms, "API access"),
    }

    response
}
