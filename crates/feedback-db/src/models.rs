//! Database row types. These map directly to SQLite rows and are converted
//! into `feedback-types` models at the store boundary.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub struct FormRow {
    pub id: String,
    pub url: String,
}

pub struct FeedbackRow {
    pub id: String,
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
    pub created_at: String,
}

/// Position after the last record of a listing page. Rows strictly older than
/// `created_at` follow; rows sharing that instant follow only when their id
/// sorts below `id`.
#[derive(Debug, Clone)]
pub struct PageCursor {
    pub created_at: DateTime<Utc>,
    pub id: Option<Uuid>,
}
