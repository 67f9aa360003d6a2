use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder stored when the widget could not detect the OS or screen size.
pub const UNKNOWN: &str = "Unknown";

/// A registered widget installation. `url` is the only origin allowed to
/// submit feedback for this form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    pub url: String,
}

/// Feedback as it is about to be inserted. `created_at` and `id` are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub form_id: String,
    pub message: String,
    pub image_url: Option<String>,
    pub image_name: Option<String>,
    pub image_size: Option<i64>,
    pub operating_system: String,
    pub screen_category: String,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
}

/// A persisted feedback row. Never updated or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub form_id: String,
    pub message: String,
    pub image_url: Option<String>,
    pub image_name: Option<String>,
    pub image_size: Option<i64>,
    pub operating_system: String,
    pub screen_category: String,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Who gets emailed when a form receives feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSetting {
    pub form_id: String,
    pub email: String,
    pub enabled: bool,
}
