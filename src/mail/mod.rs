//! Team invitation e-mails.
//!
//! - `smtp` - SMTP transport built from [`MailConfig`](crate::config::MailConfig)
//! - `template` - HTML and plaintext bodies

pub mod smtp;
pub mod template;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::metrics::Metrics;
use crate::types::InvitationRequest;

pub use smtp::SmtpMailer;

/// A rendered e-mail ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Something that can deliver an e-mail and report its message id.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<String>;
}

/// Validates, renders and sends invitations.
#[derive(Clone)]
pub struct InvitationService {
    transport: Option<Arc<dyn MailTransport>>,
    app_url: String,
    metrics: Arc<Metrics>,
}

impl InvitationService {
    /// `transport` is `None` when mail credentials are not configured.
    pub fn new(
        transport: Option<Arc<dyn MailTransport>>,
        app_url: impl Into<String>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            transport,
            app_url: app_url.into(),
            metrics,
        }
    }

    /// Send one invitation. Returns the message id.
    pub async fn send_invitation(&self, request: &InvitationRequest) -> Result<String> {
        let invitation = request.validate()?;
        let transport = self.transport.as_ref().ok_or(Error::MailNotConfigured)?;

        let email = template::render_invitation(&invitation, &self.app_url);
        match transport.send(email).await {
            Ok(message_id) => {
                self.metrics.inc_invitations();
                info!(
                    team_id = %invitation.team_id,
                    message_id = %message_id,
                    "Invitation email sent"
                );
                Ok(message_id)
            }
            Err(e) => {
                error!(team_id = %invitation.team_id, error = %e, "Failed to send invitation email");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InvitationDetails;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<OutgoingEmail>>,
        fail: bool,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, email: OutgoingEmail) -> Result<String> {
            if self.fail {
                return Err(Error::Mail("connection refused".to_string()));
            }
            self.sent.lock().unwrap().push(email);
            Ok("<1@codiny>".to_string())
        }
    }

    fn request() -> InvitationRequest {
        InvitationRequest {
            to: Some("dev@example.com".to_string()),
            subject: Some("You're invited".to_string()),
            invitation_details: Some(InvitationDetails {
                team_id: Some(serde_json::json!("t1")),
                accept_link: Some("/invitations/t1/accept".to_string()),
                invited_by: Some("octocat".to_string()),
                team_name: Some("Platform".to_string()),
                role: Some("admin".to_string()),
            }),
        }
    }

    #[tokio::test]
    async fn test_send_invitation() {
        let transport = Arc::new(RecordingTransport::default());
        let metrics = Metrics::new();
        let service = InvitationService::new(
            Some(transport.clone()),
            "https://codiny.dev",
            metrics.clone(),
        );

        let id = service.send_invitation(&request()).await.unwrap();
        assert_eq!(id, "<1@codiny>");

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "dev@example.com");
        assert!(sent[0]
            .text
            .contains("https://codiny.dev/invitations/t1/accept"));
        assert_eq!(metrics.snapshot().invitations_sent, 1);
    }

    #[tokio::test]
    async fn test_not_configured() {
        let service = InvitationService::new(None, "https://codiny.dev", Metrics::new());
        let err = service.send_invitation(&request()).await.unwrap_err();
        assert!(matches!(err, Error::MailNotConfigured));
    }

    #[tokio::test]
    async fn test_validation_precedes_configuration_check() {
        let service = InvitationService::new(None, "https://codiny.dev", Metrics::new());
        let err = service
            .send_invitation(&InvitationRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let transport = Arc::new(RecordingTransport {
            fail: true,
            ..Default::default()
        });
        let metrics = Metrics::new();
        let service =
            InvitationService::new(Some(transport), "https://codiny.dev", metrics.clone());

        let err = service.send_invitation(&request()).await.unwrap_err();
        assert!(matches!(err, Error::Mail(_)));
        assert_eq!(metrics.snapshot().invitations_sent, 0);
    }
}
