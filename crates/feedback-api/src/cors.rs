use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const ALLOW_METHODS: &str = "POST, OPTIONS";

/// What a request said in its `Origin` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredOrigin {
    Absent,
    Readable(String),
    /// Present but not visible ASCII. Never matches a registered form.
    Unreadable,
}

impl DeclaredOrigin {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match headers.get(header::ORIGIN).map(HeaderValue::to_str) {
            None => Self::Absent,
            Some(Ok(origin)) => Self::Readable(origin.to_owned()),
            Some(Err(_)) => Self::Unreadable,
        }
    }

    /// The value to echo in `Access-Control-Allow-Origin`.
    pub fn echo(&self) -> Option<&str> {
        match self {
            Self::Readable(origin) => Some(origin),
            Self::Absent | Self::Unreadable => None,
        }
    }
}

/// Headers attached to every ingestion response, errors included.
pub fn headers(origin: Option<&str>) -> HeaderMap {
    let allow_origin = origin
        .and_then(|o| HeaderValue::from_str(o).ok())
        .unwrap_or(HeaderValue::from_static("*"));

    let mut headers = HeaderMap::new();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    headers
}

pub fn json<T: Serialize>(status: StatusCode, origin: Option<&str>, body: &T) -> Response {
    (status, headers(origin), Json(body)).into_response()
}

pub fn empty(status: StatusCode, origin: Option<&str>) -> Response {
    (status, headers(origin)).into_response()
}
