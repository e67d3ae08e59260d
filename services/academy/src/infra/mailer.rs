use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::domain::repository::Notifier;
use crate::domain::types::OutgoingEmail;
use crate::error::NotifyError;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

/// Notifier backed by the Resend HTTP API.
#[derive(Clone)]
pub struct ResendNotifier {
    client: Client,
    api_key: String,
    from: String,
    reply_to: Option<String>,
}

impl ResendNotifier {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>, reply_to: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            from: from.into(),
            reply_to,
        }
    }
}

impl Notifier for ResendNotifier {
    async fn send(&self, email: OutgoingEmail) -> Result<(), NotifyError> {
        let request = ResendRequest {
            from: &self.from,
            to: vec![&email.to],
            subject: &email.subject,
            html: &email.html,
            reply_to: self.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Development notifier: no provider configured, so the message is only logged.
#[derive(Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn send(&self, email: OutgoingEmail) -> Result<(), NotifyError> {
        info!(to = %email.to, subject = %email.subject, "[dev] email not sent, no provider configured");
        Ok(())
    }
}

/// Notifier selected at startup from configuration.
#[derive(Clone)]
pub enum AppNotifier {
    Resend(ResendNotifier),
    Log(LogNotifier),
}

impl AppNotifier {
    pub fn from_config(api_key: Option<&str>, from: &str, reply_to: Option<String>) -> Self {
        match api_key.filter(|k| !k.trim().is_empty()) {
            Some(key) => Self::Resend(ResendNotifier::new(key, from, reply_to)),
            None => Self::Log(LogNotifier),
        }
    }
}

impl Notifier for AppNotifier {
    async fn send(&self, email: OutgoingEmail) -> Result<(), NotifyError> {
        match self {
            Self::Resend(n) => n.send(email).await,
            Self::Log(n) => n.send(email).await,
        }
    }
}
