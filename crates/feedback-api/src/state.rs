use std::sync::Arc;

use feedback_db::FeedbackStore;
use feedback_notify::{NotificationDispatcher, Notifier};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn FeedbackStore>,
    /// Target of the detached dispatch after a successful ingestion. Either
    /// `dispatcher` itself or a forwarder to a remote notification endpoint.
    pub notifier: Arc<dyn Notifier>,
    /// Serves the notification endpoint.
    pub dispatcher: NotificationDispatcher,
    pub service_key: String,
    pub anon_key: Option<String>,
}

impl AppStateInner {
    /// Bearer check for server-to-server routes. The anonymous key is only
    /// honoured where `allow_anon` is set.
    pub fn accepts_bearer(&self, token: &str, allow_anon: bool) -> bool {
        if token == self.service_key {
            return true;
        }
        allow_anon && self.anon_key.as_deref().is_some_and(|key| key == token)
    }
}
