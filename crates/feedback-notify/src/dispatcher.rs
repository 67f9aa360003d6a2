use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use feedback_db::FeedbackStore;
use feedback_types::events::NotificationEvent;
use feedback_types::models::Form;

use crate::email::{Email, EmailSender, TemplateParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The form has no enabled notification settings.
    NoRecipients,
    /// Every recipient was attempted; `failed` sends were logged and dropped.
    Completed { sent: usize, failed: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("form not found: {0}")]
    FormNotFound(String),

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("notification endpoint unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("notification endpoint returned {status}: {body}")]
    Remote { status: u16, body: String },
}

/// Anything that can turn a stored-feedback event into notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: NotificationEvent) -> Result<DispatchOutcome, DispatchError>;
}

/// Resolves recipients for a form and fans out one email per recipient.
#[derive(Clone)]
pub struct NotificationDispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    store: Arc<dyn FeedbackStore>,
    sender: Arc<dyn EmailSender>,
    /// Fixed system address every notification is sent from
    from_address: String,
}

impl NotificationDispatcher {
    pub fn new(
        store: Arc<dyn FeedbackStore>,
        sender: Arc<dyn EmailSender>,
        from_address: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                store,
                sender,
                from_address: from_address.into(),
            }),
        }
    }

    pub async fn dispatch(&self, event: NotificationEvent) -> Result<DispatchOutcome, DispatchError> {
        // Run blocking store lookups off the async runtime
        let store = self.inner.store.clone();
        let form_id = event.form_id.clone();
        let (form, recipients) = tokio::task::spawn_blocking(move || {
            let form = store
                .get_form_by_id(&form_id)?
                .ok_or_else(|| DispatchError::FormNotFound(form_id.clone()))?;
            let recipients = store.get_enabled_recipients(&form.id)?;
            Ok::<_, DispatchError>((form, recipients))
        })
        .await??;

        if recipients.is_empty() {
            return Ok(DispatchOutcome::NoRecipients);
        }

        // Settle every send; one failure never short-circuits the rest
        let sends = recipients.into_iter().map(|to| {
            let email = self.build_email(&form, &event, to);
            async move {
                let result = self.inner.sender.send(&email).await;
                (email.to, result)
            }
        });
        let results = join_all(sends).await;

        let mut failed = 0;
        for (to, result) in &results {
            if let Err(e) = result {
                failed += 1;
                warn!(form_id = %form.id, to = %to, error = %e, "Failed to send notification email");
            }
        }

        Ok(DispatchOutcome::Completed {
            sent: results.len() - failed,
            failed,
        })
    }

    fn build_email(&self, form: &Form, event: &NotificationEvent, to: String) -> Email {
        Email {
            from: self.inner.from_address.clone(),
            to,
            subject: format!("New feedback for {}", form.url),
            params: TemplateParams {
                form_url: form.url.clone(),
                form_id: form.id.clone(),
                message: event.message.clone(),
                user_name: event.user_name.clone(),
                user_email: event.user_email.clone(),
                has_user_info: event.has_user_info(),
                operating_system: event.operating_system.clone(),
                screen_category: event.screen_category.clone(),
                image_url: event.image_url.clone(),
                created_at: event.created_at.to_rfc3339(),
            },
        }
    }
}

#[async_trait]
impl Notifier for NotificationDispatcher {
    async fn notify(&self, event: NotificationEvent) -> Result<DispatchOutcome, DispatchError> {
        self.dispatch(event).await
    }
}

/// Run a notification in the background. The returned handle is only useful
/// to tests; request handlers drop it. Errors and panics end up in the log.
pub fn spawn_detached(notifier: Arc<dyn Notifier>, event: NotificationEvent) -> JoinHandle<()> {
    tokio::spawn(async move {
        let form_id = event.form_id.clone();

        match AssertUnwindSafe(notifier.notify(event)).catch_unwind().await {
            Ok(Ok(DispatchOutcome::NoRecipients)) => {
                info!(form_id = %form_id, "No enabled notification recipients, skipping");
            }
            Ok(Ok(DispatchOutcome::Completed { sent, failed })) => {
                info!(form_id = %form_id, sent, failed, "Notification dispatch finished");
            }
            Ok(Err(DispatchError::FormNotFound(_))) => {
                info!(form_id = %form_id, "Form not found, no notifications sent");
            }
            Ok(Err(e)) => {
                error!(form_id = %form_id, error = %e, "Notification dispatch failed");
            }
            Err(_) => {
                error!(form_id = %form_id, "Notification dispatch panicked");
            }
        }
    })
}
