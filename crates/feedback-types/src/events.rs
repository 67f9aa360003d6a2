use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::FeedbackRecord;

/// Payload handed from ingestion to notification dispatch. Never persisted;
/// it lives only for the duration of one detached dispatch. The same shape is
/// the JSON body of the server-to-server notification endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(rename = "formId")]
    pub form_id: String,
    pub message: String,
    #[serde(rename = "userName", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(rename = "userEmail", default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn from_record(record: &FeedbackRecord) -> Self {
        Self {
            form_id: record.form_id.clone(),
            message: record.message.clone(),
            user_name: record.user_name.clone(),
            user_email: record.user_email.clone(),
            operating_system: Some(record.operating_system.clone()),
            screen_category: Some(record.screen_category.clone()),
            image_url: record.image_url.clone(),
            created_at: record.created_at,
        }
    }

    /// True when the submitter identified themselves by name or email.
    pub fn has_user_info(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.user_name) || present(&self.user_email)
    }
}
