use axum::{Json, body::Bytes, extract::State, response::IntoResponse};
use tracing::{error, warn};

use feedback_notify::{DispatchError, DispatchOutcome};
use feedback_types::api::NotifyResponse;
use feedback_types::events::NotificationEvent;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /notifications — server-to-server. Unlike the detached path, the
/// caller waits for the fan-out and sees its result.
pub async fn send_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let event: NotificationEvent = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejected unparseable notification body");
        ApiError::InvalidRequest
    })?;
    let form_id = event.form_id.clone();

    match state.dispatcher.dispatch(event).await {
        Ok(DispatchOutcome::NoRecipients) => Ok(Json(NotifyResponse::Skipped {
            message: "No notification settings found".into(),
        })),
        Ok(DispatchOutcome::Completed { sent: 0, failed }) if failed > 0 => {
            error!(form_id = %form_id, failed, "Every notification email failed");
            Err(ApiError::NotificationFailed)
        }
        Ok(DispatchOutcome::Completed { sent, failed }) => Ok(Json(NotifyResponse::Sent {
            success: true,
            sent,
            failed,
        })),
        Err(DispatchError::FormNotFound(_)) => Err(ApiError::FormNotFound),
        Err(e) => {
            error!(form_id = %form_id, error = %e, "Notification dispatch failed");
            Err(ApiError::NotificationFailed)
        }
    }
}
