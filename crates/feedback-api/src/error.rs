use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use feedback_types::api::ErrorResponse;

use crate::cors;

/// Every failure the HTTP layer can report. The display string is the
/// `error` field of the JSON body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request data")]
    InvalidRequest,

    #[error("Origin not allowed")]
    OriginNotAllowed,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Form not found")]
    FormNotFound,

    #[error("Failed to send notification")]
    NotificationFailed,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::OriginNotAllowed => StatusCode::FORBIDDEN,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::FormNotFound => StatusCode::NOT_FOUND,
            Self::NotificationFailed | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }

    /// Error response for the browser-facing endpoint, with CORS headers.
    pub fn into_cors_response(self, origin: Option<&str>) -> Response {
        cors::json(self.status(), origin, &self.body())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
