use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{error, warn};
use uuid::Uuid;

use feedback_db::PageCursor;
use feedback_types::models::FeedbackRecord;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedbackQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Cursor: the `created_at` of the oldest record on the previous page.
    pub before: Option<String>,
    /// That record's id, to page through records sharing a timestamp.
    pub before_id: Option<String>,
}

impl FeedbackQuery {
    fn cursor(&self) -> Result<Option<PageCursor>, ApiError> {
        let Some(before) = self.before.as_deref() else {
            return match self.before_id {
                Some(_) => Err(ApiError::InvalidRequest),
                None => Ok(None),
            };
        };

        let created_at = before.parse::<DateTime<Utc>>().map_err(|e| {
            warn!(before = %before, error = %e, "Rejected listing cursor");
            ApiError::InvalidRequest
        })?;
        let id = self
            .before_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|e| {
                warn!(error = %e, "Rejected listing cursor id");
                ApiError::InvalidRequest
            })?;

        Ok(Some(PageCursor { created_at, id }))
    }
}

fn default_limit() -> u32 {
    50
}

/// GET /forms/{form_id}/feedback — newest first.
pub async fn list_feedback(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Query(query): Query<FeedbackQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.clone();
    let limit = query.limit.clamp(1, 200);
    let cursor = query.cursor()?;

    let records = tokio::task::spawn_blocking(move || -> anyhow::Result<Option<Vec<FeedbackRecord>>> {
        if store.get_form_by_id(&form_id)?.is_none() {
            return Ok(None);
        }
        store
            .list_feedback(&form_id, limit, cursor.as_ref())
            .map(Some)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal
    })?
    .map_err(|e| {
        error!(error = %e, "Failed to list feedback");
        ApiError::Internal
    })?
    .ok_or(ApiError::FormNotFound)?;

    Ok(Json(records))
}
