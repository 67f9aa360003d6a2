use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Service keys that ship in sample `.env` files and must never be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me", "dev-service-key-change-me"];

pub const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com/emails";
pub const DEFAULT_EMAIL_FROM: &str = "Feedback <notifications@feedback.dev>";

/// Runtime configuration, read from the environment.
///
/// | Variable                 | Required | Default                                  |
/// |--------------------------|----------|------------------------------------------|
/// | `FEEDBACK_HOST`          | no       | `0.0.0.0`                                |
/// | `FEEDBACK_PORT`          | no       | `3000`                                   |
/// | `FEEDBACK_DB_PATH`       | no       | `feedback.db`                            |
/// | `FEEDBACK_SERVICE_KEY`   | yes      |                                          |
/// | `FEEDBACK_ANON_KEY`      | no       |                                          |
/// | `FEEDBACK_NOTIFY_URL`    | no       | in-process dispatch                      |
/// | `FEEDBACK_EMAIL_API_KEY` | no       | log-only delivery                        |
/// | `FEEDBACK_EMAIL_API_URL` | no       | `https://api.resend.com/emails`          |
/// | `FEEDBACK_EMAIL_FROM`    | no       | `Feedback <notifications@feedback.dev>`  |
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub service_key: String,
    pub anon_key: Option<String>,
    pub notify_url: Option<String>,
    pub email_api_key: Option<String>,
    pub email_api_url: String,
    pub email_from: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let service_key = get("FEEDBACK_SERVICE_KEY").unwrap_or_default();
        if service_key.is_empty() || PLACEHOLDER_SECRETS.contains(&service_key.as_str()) {
            bail!("FEEDBACK_SERVICE_KEY is unset or still a placeholder");
        }

        let port = match get("FEEDBACK_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("FEEDBACK_PORT is not a valid port: {raw}"))?,
            None => 3000,
        };

        Ok(Self {
            host: get("FEEDBACK_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: get("FEEDBACK_DB_PATH").unwrap_or_else(|| "feedback.db".into()).into(),
            service_key,
            anon_key: get("FEEDBACK_ANON_KEY"),
            notify_url: get("FEEDBACK_NOTIFY_URL"),
            email_api_key: get("FEEDBACK_EMAIL_API_KEY"),
            email_api_url: get("FEEDBACK_EMAIL_API_URL").unwrap_or_else(|| DEFAULT_EMAIL_API_URL.into()),
            email_from: get("FEEDBACK_EMAIL_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.into()),
        })
    }
}
