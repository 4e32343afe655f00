//! services/api/src/web/middleware.rs
//!
//! Admin gate for the review routes.
//!
//! Full authentication and session management live outside this service; the
//! review endpoints are protected by a shared secret checked against the
//! `x-admin-token` header. When no token is configured (local development)
//! the gate is disabled.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::web::state::AppState;

/// Middleware that rejects requests whose `x-admin-token` header does not
/// match the configured secret.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = state.config.admin_token.as_deref() else {
        return Ok(next.run(req).await);
    };

    let presented = req
        .headers()
        .get("x-admin-token")
        .and_then(|v| v.to_str().ok());

    match presented {
        Some(token) if token == expected => Ok(next.run(req).await),
        _ => {
            warn!("Rejected admin request with missing or bad token");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
