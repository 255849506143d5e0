//! SMTP delivery via lettre.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;
use uuid::Uuid;

use super::{MailTransport, OutgoingEmail};
use crate::config::MailConfig;
use crate::error::{Error, Result};

/// Mail transport backed by an authenticated SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer, or `None` when credentials are missing.
    pub fn from_config(config: &MailConfig) -> Result<Option<Self>> {
        let Some((username, password)) = config.credentials() else {
            return Ok(None);
        };

        let from: Mailbox = format!("Codiny <{}>", username)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid sender address {}: {}", username, e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| Error::Config(format!("Invalid SMTP relay {}: {}", config.smtp_host, e)))?
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();

        Ok(Some(Self { transport, from }))
    }

    fn message_id(&self) -> String {
        format!("<{}@{}>", Uuid::new_v4(), self.from.email.domain())
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<String> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| Error::Mail(format!("Invalid recipient {}: {}", email.to, e)))?;

        let message_id = self.message_id();
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .message_id(Some(message_id.clone()))
            .multipart(MultiPart::alternative_plain_html(email.text, email.html))
            .map_err(|e| Error::Mail(format!("Failed to build message: {}", e)))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| Error::Mail(e.to_string()))?;
        debug!(code = %response.code(), "SMTP relay accepted message");

        Ok(message_id)
    }
}
