/// Delivery through a transactional email HTTP API
///
/// Each message is one `POST {api_url}/email` with a JSON body:
///
/// ```json
/// {"From": "...", "To": "a@x.com, b@y.com", "Subject": "...", "HtmlBody": "..."}
/// ```
///
/// authenticated by an `X-Server-Token` header.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{EmailMessage, MailError, Mailer};

/// Settings for [`HttpMailer`]
#[derive(Debug, Clone)]
pub struct HttpMailerConfig {
    /// Base URL of the email API
    pub api_url: String,

    /// Value of the `X-Server-Token` header
    pub api_token: String,

    /// Sender address
    pub sender: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct HttpMailer {
    http_client: Client,
    config: HttpMailerConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: String,
    subject: &'a str,
    html_body: &'a str,
}

impl HttpMailer {
    pub fn new(config: HttpMailerConfig) -> Result<Self, MailError> {
        if config.api_url.is_empty() {
            return Err(MailError::Config("MAIL_API_URL is required".to_string()));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/email", self.config.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        if message.recipients.is_empty() {
            return Err(MailError::NoRecipients);
        }

        let body = SendEmailRequest {
            from: &self.config.sender,
            to: message.recipients.join(", "),
            subject: &message.subject,
            html_body: &message.html_body,
        };

        self.http_client
            .post(self.endpoint())
            .header("X-Server-Token", &self.config.api_token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
