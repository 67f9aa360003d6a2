//! Outbound email: the "send one email" contract and its implementations.
//!
//! [`HttpEmailSender`] talks to a transactional email API over HTTPS using a
//! bearer secret. [`LogEmailSender`] is used when no provider secret is
//! configured and only writes the email to the log.

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// Connection, TLS or timeout failure talking to the provider.
    #[error("email transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("email provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Values substituted into the notification template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateParams {
    pub form_url: String,
    pub form_id: String,
    pub message: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub has_user_info: bool,
    pub operating_system: Option<String>,
    pub screen_category: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
}

/// One outbound email to one recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub params: TemplateParams,
}

impl Email {
    /// Plain-text body rendered from the template parameters.
    pub fn render_text(&self) -> String {
        let p = &self.params;
        let mut body = format!(
            "You received new feedback on {}\n\nForm: {}\nReceived: {}\n\n{}\n",
            p.form_url, p.form_id, p.created_at, p.message
        );

        if p.has_user_info {
            body.push_str("\nFrom:\n");
            if let Some(name) = p.user_name.as_deref().filter(|s| !s.trim().is_empty()) {
                body.push_str(&format!("  Name: {}\n", name));
            }
            if let Some(email) = p.user_email.as_deref().filter(|s| !s.trim().is_empty()) {
                body.push_str(&format!("  Email: {}\n", email));
            }
        } else {
            body.push_str("\nSubmitted anonymously.\n");
        }

        body.push_str("\nDetails:\n");
        if let Some(os) = &p.operating_system {
            body.push_str(&format!("  Operating system: {}\n", os));
        }
        if let Some(screen) = &p.screen_category {
            body.push_str(&format!("  Screen: {}\n", screen));
        }
        if let Some(image) = &p.image_url {
            body.push_str(&format!("  Screenshot: {}\n", image));
        }

        body
    }
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), EmailError>;
}

// ---------------------------------------------------------------------------
// HttpEmailSender
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ProviderRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: String,
}

pub struct HttpEmailSender {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HttpEmailSender {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, email: &Email) -> Result<(), EmailError> {
        let request = ProviderRequest {
            from: &email.from,
            to: [&email.to],
            subject: &email.subject,
            text: email.render_text(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(to = %email.to, "Notification email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LogEmailSender
// ---------------------------------------------------------------------------

/// Development sender: logs instead of delivering.
#[derive(Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, email: &Email) -> Result<(), EmailError> {
        info!(
            to = %email.to,
            subject = %email.subject,
            body = %email.render_text(),
            "Email delivery disabled, logging notification instead"
        );
        Ok(())
    }
}
