//! Error types for the Codiny server.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type alias for Codiny operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Codiny server.
#[derive(Error, Debug)]
pub enum Error {
    // ===== Request Errors =====
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ===== Completion Service Errors =====
    #[error("API error: {status} {status_text} - {message}")]
    Api {
        status: u16,
        status_text: String,
        message: String,
    },

    #[error("Completion request failed: {0}")]
    Completion(String),

    #[error("Failed to parse AI response: {0}")]
    ResponseParse(String),

    #[error("AI response doesn't match expected format: {0}")]
    ResponseShape(String),

    // ===== Mail Errors =====
    #[error("Email service is not configured")]
    MailNotConfigured,

    #[error("Mail transport error: {0}")]
    Mail(String),

    // ===== I/O Errors =====
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ===== HTTP Errors =====
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // ===== Internal Errors =====
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an API error from HTTP response details.
    pub fn api(status: u16, status_text: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            status_text: status_text.into(),
            message: message.into(),
        }
    }

    /// HTTP status code this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The completion service was unreachable or refused the request.
    pub fn is_upstream_transport(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Http(_) | Self::Completion(_))
    }

    /// The completion service answered, but with an unusable payload.
    pub fn is_upstream_shape(&self) -> bool {
        matches!(self, Self::ResponseParse(_) | Self::ResponseShape(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let api_err = Error::api(401, "Unauthorized", "invalid api key");
        assert_eq!(
            api_err.to_string(),
            "API error: 401 Unauthorized - invalid api key"
        );

        let input_err = Error::InvalidInput("No code provided for review".to_string());
        assert_eq!(
            input_err.to_string(),
            "Invalid input: No code provided for review"
        );

        assert_eq!(
            Error::MailNotConfigured.to_string(),
            "Email service is not configured"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::InvalidInput("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::NotFound("x".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::ResponseParse("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::api(503, "Service Unavailable", "").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::MailNotConfigured.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_classification() {
        assert!(Error::api(500, "Internal Server Error", "").is_upstream_transport());
        assert!(Error::Completion("connection refused".to_string()).is_upstream_transport());
        assert!(!Error::ResponseParse("eof".to_string()).is_upstream_transport());

        assert!(Error::ResponseParse("eof".to_string()).is_upstream_shape());
        assert!(Error::ResponseShape("missing score".to_string()).is_upstream_shape());
        assert!(!Error::InvalidInput("x".to_string()).is_upstream_shape());
    }
}
