use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

fn bearer_token(req: &Request) -> Result<&str, ApiError> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)
}

/// Service key only. Guards the feedback listing.
pub async fn require_service_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req)?;
    if !state.accepts_bearer(token, false) {
        warn!(path = %req.uri().path(), "Rejected request with invalid service key");
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(req).await)
}

/// Service key or anonymous key. Guards the notification endpoint, which is
/// called by whichever deployment runs ingestion.
pub async fn require_caller_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req)?;
    if !state.accepts_bearer(token, true) {
        warn!(path = %req.uri().path(), "Rejected request with invalid bearer");
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(req).await)
}
