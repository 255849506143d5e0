//! Team invitation types.

use lettre::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Body of `POST /send-invitation`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationRequest {
    /// Recipient address
    #[serde(default)]
    pub to: Option<String>,
    /// Mail subject
    #[serde(default)]
    pub subject: Option<String>,
    /// Team and link details
    #[serde(default)]
    pub invitation_details: Option<InvitationDetails>,
}

/// Details rendered into the invitation e-mail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationDetails {
    /// Team identifier; the dashboard sends either a string or a number
    #[serde(default)]
    pub team_id: Option<Value>,
    #[serde(default)]
    pub accept_link: Option<String>,
    #[serde(default)]
    pub invited_by: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// A fully validated invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub to: String,
    pub subject: String,
    pub team_id: String,
    pub accept_link: String,
    pub invited_by: String,
    pub team_name: String,
    pub role: String,
}

/// Response of `POST /send-invitation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InvitationResponse {
    pub fn sent(message_id: String) -> Self {
        Self {
            success: true,
            message: "Invitation email sent successfully".to_string(),
            message_id: Some(message_id),
            error: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            message_id: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: "Failed to send invitation email".to_string(),
            message_id: None,
            error: Some(error.into()),
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(String::from)
}

fn id_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl InvitationRequest {
    /// Check required fields and produce a validated [`Invitation`].
    pub fn validate(&self) -> Result<Invitation> {
        let (to, subject) = match (non_empty(self.to.as_ref()), non_empty(self.subject.as_ref())) {
            (Some(to), Some(subject)) => (to, subject),
            _ => {
                return Err(Error::InvalidInput(
                    "Recipient email and subject are required".to_string(),
                ))
            }
        };

        let missing = || Error::InvalidInput("Invitation details are required".to_string());
        let details = self.invitation_details.as_ref().ok_or_else(missing)?;

        let invitation = Invitation {
            to,
            subject,
            team_id: id_text(details.team_id.as_ref()).ok_or_else(missing)?,
            accept_link: non_empty(details.accept_link.as_ref()).ok_or_else(missing)?,
            invited_by: non_empty(details.invited_by.as_ref()).ok_or_else(missing)?,
            team_name: non_empty(details.team_name.as_ref()).ok_or_else(missing)?,
            role: non_empty(details.role.as_ref()).ok_or_else(missing)?,
        };

        if invitation.to.parse::<Address>().is_err() {
            return Err(Error::InvalidInput(format!(
                "Invalid recipient email address: {}",
                invitation.to
            )));
        }
        Ok(invitation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_request() -> Value {
        json!({
            "to": "dev@example.com",
            "subject": "Join Platform on Codiny",
            "invitationDetails": {
                "teamId": "team_42",
                "acceptLink": "https://codiny.dev/invitations/abc",
                "invitedBy": "octocat",
                "teamName": "Platform",
                "role": "member"
            }
        })
    }

    fn message_of(err: Error) -> String {
        match err {
            Error::InvalidInput(m) => m,
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_complete_request() {
        let req: InvitationRequest = serde_json::from_value(full_request()).unwrap();
        let invitation = req.validate().unwrap();

        assert_eq!(invitation.to, "dev@example.com");
        assert_eq!(invitation.team_id, "team_42");
        assert_eq!(invitation.team_name, "Platform");
        assert_eq!(invitation.role, "member");
    }

    #[test]
    fn test_numeric_team_id() {
        let mut body = full_request();
        body["invitationDetails"]["teamId"] = json!(7);
        let req: InvitationRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.validate().unwrap().team_id, "7");
    }

    #[test]
    fn test_missing_recipient_or_subject() {
        let mut body = full_request();
        body.as_object_mut().unwrap().remove("to");
        let req: InvitationRequest = serde_json::from_value(body).unwrap();
        assert_eq!(
            message_of(req.validate().unwrap_err()),
            "Recipient email and subject are required"
        );

        let mut body = full_request();
        body["subject"] = json!("  ");
        let req: InvitationRequest = serde_json::from_value(body).unwrap();
        assert_eq!(
            message_of(req.validate().unwrap_err()),
            "Recipient email and subject are required"
        );
    }

    #[test]
    fn test_missing_accept_link() {
        let mut body = full_request();
        body["invitationDetails"]
            .as_object_mut()
            .unwrap()
            .remove("acceptLink");
        let req: InvitationRequest = serde_json::from_value(body).unwrap();
        assert_eq!(
            message_of(req.validate().unwrap_err()),
            "Invitation details are required"
        );
    }

    #[test]
    fn test_missing_details_object() {
        let req = InvitationRequest {
            to: Some("dev@example.com".to_string()),
            subject: Some("Hi".to_string()),
            invitation_details: None,
        };
        assert_eq!(
            message_of(req.validate().unwrap_err()),
            "Invitation details are required"
        );
    }

    #[test]
    fn test_response_serialization() {
        let sent = serde_json::to_value(InvitationResponse::sent("<id@codiny>".to_string())).unwrap();
        assert_eq!(
            sent,
            json!({
                "success": true,
                "message": "Invitation email sent successfully",
                "messageId": "<id@codiny>"
            })
        );

        let failed = serde_json::to_value(InvitationResponse::failed("timeout")).unwrap();
        assert_eq!(failed["success"], json!(false));
        assert_eq!(failed["error"], json!("timeout"));
        assert!(failed.get("messageId").is_none());
    }

    #[test]
    fn test_invalid_recipient_address() {
        let mut body = full_request();
        body["to"] = json!("not-an-address");
        let req: InvitationRequest = serde_json::from_value(body).unwrap();
        assert_eq!(
            message_of(req.validate().unwrap_err()),
            "Invalid recipient email address: not-an-address"
        );
    }

    #[test]
    fn test_missing_details_checked_before_address() {
        let mut body = full_request();
        body["to"] = json!("not-an-address");
        body.as_object_mut().unwrap().remove("invitationDetails");
        let req: InvitationRequest = serde_json::from_value(body).unwrap();
        assert_eq!(
            message_of(req.validate().unwrap_err()),
            "Invitation details are required"
        );
    }
}
