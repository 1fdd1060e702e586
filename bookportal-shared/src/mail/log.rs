use async_trait::async_trait;

use super::{EmailMessage, MailError, Mailer};

/// Mailer that only logs what it would have sent
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        if message.recipients.is_empty() {
            return Err(MailError::NoRecipients);
        }

        tracing::info!(
            to = ?message.recipients,
            subject = %message.subject,
            body = %message.html_body,
            "Email (log delivery)"
        );
        Ok(())
    }
}
