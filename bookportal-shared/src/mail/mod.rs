/// Outgoing email
///
/// Handlers never talk to an email provider directly. They build an
/// [`EmailMessage`] and hand it to a [`Mailer`] through [`send_in_background`],
/// so delivery latency and delivery failures stay out of the request path.
///
/// # Implementations
///
/// - [`HttpMailer`]: POSTs to a transactional email HTTP API
/// - [`LogMailer`]: writes the message to the log (development)

pub mod http;
pub mod log;
pub mod templates;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use http::{HttpMailer, HttpMailerConfig};
pub use log::LogMailer;

/// Errors from email delivery
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Mail configuration error: {0}")]
    Config(String),

    #[error("Failed to send email: {0}")]
    Delivery(#[from] reqwest::Error),

    #[error("Email has no recipients")]
    NoRecipients,
}

/// A rendered email ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub recipients: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

impl EmailMessage {
    pub fn new(
        recipients: Vec<String>,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            recipients,
            subject: subject.into(),
            html_body: html_body.into(),
        }
    }
}

/// Delivers email
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}

/// Sends `message` on a spawned task; failures are logged, not returned
pub fn send_in_background(mailer: Arc<dyn Mailer>, message: EmailMessage) {
    tokio::spawn(async move {
        let recipients = message.recipients.len();
        let subject = message.subject.clone();

        match mailer.send(message).await {
            Ok(()) => tracing::debug!(recipients, %subject, "Email sent"),
            Err(e) => tracing::error!(error = %e, recipients, %subject, "Failed to send email"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<EmailMessage>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
            self.sent.lock().await.push(message);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_send_in_background_delivers() {
        let mailer = Arc::new(RecordingMailer::default());
        let message = EmailMessage::new(vec!["a@example.com".to_string()], "Hi", "<p>Hi</p>");

        send_in_background(mailer.clone(), message.clone());

        for _ in 0..50 {
            if !mailer.sent.lock().await.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(mailer.sent.lock().await.as_slice(), &[message]);
    }
}
