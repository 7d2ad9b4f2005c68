use async_trait::async_trait;
use thiserror::Error;

/// Outbound mail message: plain-text body plus a minimal HTML rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl MailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        let text = body.into();
        let html = format!(r#"<div style="font-family: Arial, sans-serif;">{text}</div>"#);
        Self {
            to: to.into(),
            subject: subject.into(),
            text,
            html,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Synchronous-contract mail transport (SMTP or equivalent).
///
/// A failure here fails the whole triggering operation; no retry or backoff
/// is attempted anywhere in the system.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &MailMessage) -> Result<(), MailError>;
}

/// Transport that only logs. Used in development environments where no
/// SMTP relay is configured.
pub struct LogMailTransport;

#[async_trait]
impl MailTransport for LogMailTransport {
    async fn send(&self, mail: &MailMessage) -> Result<(), MailError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, "mail transport disabled, logging only");
        Ok(())
    }
}
