use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::{error, warn};

use feedback_notify::spawn_detached;
use feedback_types::api::{SubmitFeedbackRequest, SuccessResponse};
use feedback_types::events::NotificationEvent;
use feedback_types::models::{NewFeedback, UNKNOWN};

use crate::cors::{self, DeclaredOrigin};
use crate::error::ApiError;
use crate::origin;
use crate::state::AppState;

/// POST /feedback — validate, authorize the origin, store, then hand the
/// stored record to a detached notification dispatch.
///
/// The response is decided by persistence alone. Dispatch runs on its own
/// task after the insert succeeds and its outcome only reaches the log.
pub async fn submit_feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let origin = DeclaredOrigin::from_headers(&headers);

    let result = match body {
        Ok(body) => ingest(&state, &origin, &body).await,
        Err(rejection) => Err(reject_body(rejection)),
    };

    match result {
        Ok(()) => cors::json(StatusCode::OK, origin.echo(), &SuccessResponse { success: true }),
        Err(e) => e.into_cors_response(origin.echo()),
    }
}

/// OPTIONS /feedback
pub async fn preflight(headers: HeaderMap) -> Response {
    let origin = DeclaredOrigin::from_headers(&headers);
    cors::empty(StatusCode::NO_CONTENT, origin.echo())
}

/// Any other method on /feedback.
pub async fn method_not_allowed(headers: HeaderMap) -> Response {
    let origin = DeclaredOrigin::from_headers(&headers);
    ApiError::MethodNotAllowed.into_cors_response(origin.echo())
}

fn reject_body(rejection: BytesRejection) -> ApiError {
    warn!(error = %rejection, "Rejected feedback body");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::InvalidRequest
    }
}

async fn ingest(state: &AppState, origin: &DeclaredOrigin, body: &[u8]) -> Result<(), ApiError> {
    let req: SubmitFeedbackRequest = serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Rejected unparseable feedback body");
        ApiError::InvalidRequest
    })?;

    let feedback = validate(req).ok_or_else(|| {
        warn!("Rejected feedback with missing formId or blank message");
        ApiError::InvalidRequest
    })?;

    // Requests without an Origin header come from non-browser callers and
    // skip the origin check. A header that is present but unreadable is
    // rejected outright.
    let origin = match origin {
        DeclaredOrigin::Absent => None,
        DeclaredOrigin::Readable(origin) => Some(origin.as_str()),
        DeclaredOrigin::Unreadable => {
            warn!(form_id = %feedback.form_id, "Rejected non-ASCII Origin header");
            return Err(ApiError::OriginNotAllowed);
        }
    };

    if let Some(origin) = origin {
        let store = state.store.clone();
        let form_id = feedback.form_id.clone();
        let form = tokio::task::spawn_blocking(move || store.get_form_by_id(&form_id))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                ApiError::Internal
            })?
            .map_err(|e| {
                error!(form_id = %feedback.form_id, error = %e, "Form lookup failed");
                ApiError::Internal
            })?;

        let allowed = form.as_ref().is_some_and(|form| origin::is_allowed(origin, &form.url));
        if !allowed {
            warn!(form_id = %feedback.form_id, origin = %origin, "Origin not allowed for form");
            return Err(ApiError::OriginNotAllowed);
        }
    }

    let store = state.store.clone();
    let record = tokio::task::spawn_blocking(move || store.insert_feedback(&feedback))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(|e| {
            error!(error = %e, "Failed to insert feedback");
            ApiError::Internal
        })?;

    // Fire and forget: the caller gets its 200 regardless of what happens here
    spawn_detached(state.notifier.clone(), NotificationEvent::from_record(&record));

    Ok(())
}

/// Required fields present and non-blank; optional blanks become `None`,
/// missing device details become "Unknown".
fn validate(req: SubmitFeedbackRequest) -> Option<NewFeedback> {
    let form_id = non_blank(req.form_id)?;
    let message = non_blank(req.message)?;

    Some(NewFeedback {
        form_id,
        message,
        image_url: non_blank(req.image_url),
        image_name: non_blank(req.image_name),
        image_size: req.image_size,
        operating_system: non_blank(req.operating_system).unwrap_or_else(|| UNKNOWN.to_string()),
        screen_category: non_blank(req.screen_category).unwrap_or_else(|| UNKNOWN.to_string()),
        user_id: non_blank(req.user_id),
        user_email: non_blank(req.user_email),
        user_name: non_blank(req.user_name),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
