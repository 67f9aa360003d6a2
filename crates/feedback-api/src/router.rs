use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::state::AppState;
use crate::{feedback, ingest, notify};

/// Feedback bodies are text plus a screenshot URL, never the image itself.
const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn build(state: AppState) -> Router {
    let widget_routes = Router::new().route(
        "/feedback",
        post(ingest::submit_feedback)
            .options(ingest::preflight)
            .fallback(ingest::method_not_allowed),
    );

    let notify_routes = Router::new()
        .route("/notifications", post(notify::send_notification))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::require_caller_key,
        ));

    let dashboard_routes = Router::new()
        .route("/forms/{form_id}/feedback", get(feedback::list_feedback))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::require_service_key,
        ));

    Router::new()
        .merge(widget_routes)
        .merge(notify_routes)
        .merge(dashboard_routes)
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
