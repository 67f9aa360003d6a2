use async_trait::async_trait;
use reqwest::StatusCode;

use feedback_types::api::NotifyResponse;
use feedback_types::events::NotificationEvent;

use crate::dispatcher::{DispatchError, DispatchOutcome, Notifier};

/// Forwards events to a separately deployed notification endpoint instead of
/// dispatching in-process.
pub struct RemoteNotifier {
    client: reqwest::Client,
    url: String,
    service_key: String,
}

impl RemoteNotifier {
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            service_key: service_key.into(),
        }
    }
}

#[async_trait]
impl Notifier for RemoteNotifier {
    async fn notify(&self, event: NotificationEvent) -> Result<DispatchOutcome, DispatchError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.service_key)
            .json(&event)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => match response.json::<NotifyResponse>().await? {
                NotifyResponse::Sent { sent, failed, .. } => Ok(DispatchOutcome::Completed { sent, failed }),
                NotifyResponse::Skipped { .. } => Ok(DispatchOutcome::NoRecipients),
            },
            StatusCode::NOT_FOUND => Err(DispatchError::FormNotFound(event.form_id)),
            status => Err(DispatchError::Remote {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}
