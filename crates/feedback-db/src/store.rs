use anyhow::Result;
use feedback_types::models::{FeedbackRecord, Form, NewFeedback};

use crate::{Database, PageCursor};

/// The persistence boundary the pipeline depends on. Calls are blocking;
/// async callers run them on `spawn_blocking`.
pub trait FeedbackStore: Send + Sync {
    fn get_form_by_id(&self, id: &str) -> Result<Option<Form>>;

    /// Insert one record, returning it with `id` and `created_at` assigned.
    fn insert_feedback(&self, feedback: &NewFeedback) -> Result<FeedbackRecord>;

    /// Addresses of the enabled notification settings for a form. May be empty.
    fn get_enabled_recipients(&self, form_id: &str) -> Result<Vec<String>>;

    /// Newest-first page of a form's feedback, for the dashboard listing.
    fn list_feedback(&self, form_id: &str, limit: u32, before: Option<&PageCursor>) -> Result<Vec<FeedbackRecord>>;
}

impl FeedbackStore for Database {
    fn get_form_by_id(&self, id: &str) -> Result<Option<Form>> {
        Ok(self.get_form(id)?.map(|row| Form {
            id: row.id,
            url: row.url,
        }))
    }

    fn insert_feedback(&self, feedback: &NewFeedback) -> Result<FeedbackRecord> {
        Database::insert_feedback(self, feedback)
    }

    fn get_enabled_recipients(&self, form_id: &str) -> Result<Vec<String>> {
        self.enabled_recipients(form_id)
    }

    fn list_feedback(&self, form_id: &str, limit: u32, before: Option<&PageCursor>) -> Result<Vec<FeedbackRecord>> {
        Database::list_feedback(self, form_id, limit, before)
    }
}
