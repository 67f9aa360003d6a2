use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// -- Ingestion --

/// Body posted by the embedded widget. Everything is optional at the serde
/// level so that missing required fields surface as a validation error
/// rather than a parse error.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SubmitFeedbackRequest {
    #[serde(rename = "formId")]
    pub form_id: Option<String>,
    pub message: Option<String>,
    pub image_url: Option<String>,
    pub image_name: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub image_size: Option<i64>,
    pub operating_system: Option<String>,
    pub screen_category: Option<String>,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// -- Notification endpoint --

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotifyResponse {
    Sent { success: bool, sent: usize, failed: usize },
    Skipped { message: String },
}

/// Widgets send the image size either as a JSON number or as a numeric string.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => match n.as_i64() {
            Some(size) => Ok(Some(size)),
            // Integral floats such as 2048.0 are fine; fractions and values
            // beyond i64 are not.
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| Some(f as i64))
                .ok_or_else(|| D::Error::custom(format!("invalid image_size: {n}"))),
        },
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => s.trim().parse().map(Some).map_err(D::Error::custom),
        Some(other) => Err(D::Error::custom(format!("invalid image_size: {other}"))),
    }
}
