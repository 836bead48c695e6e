//! Error taxonomy shared by every network exchange and form submission.

use thiserror::Error;

use crate::validation::ValidationError;

/// Shown when the request never reached the server.
pub const NETWORK_MESSAGE: &str =
    "Unable to reach the server. Please check your connection and try again.";
/// Shown when the server did not answer within the client timeout.
pub const TIMEOUT_MESSAGE: &str = "The server took too long to respond. Please try again.";
/// Shown for a missing or rejected session.
pub const UNAUTHORIZED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// How a failed operation should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any request was made.
    Validation,
    /// The request never completed.
    Network,
    /// The request exceeded the client-side timeout.
    Timeout,
    /// The server answered with an error or an unexpected body.
    Application,
    /// The session is missing or the server answered `401`.
    Unauthorized,
    /// `403` with `needsVerification: true`.
    VerificationRequired,
}

/// Failure of a single request or form submission.
///
/// `Display` is the message to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

/// Result of one network exchange.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn network() -> Self {
        Self::new(ErrorKind::Network, NETWORK_MESSAGE)
    }

    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout, TIMEOUT_MESSAGE)
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized, UNAUTHORIZED_MESSAGE)
    }

    /// Non-2xx response. Falls back to a generic text when the server did not
    /// send a message.
    pub fn application(status: Option<u16>, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| match status {
                Some(code) => format!("Request failed (HTTP {code})"),
                None => "Unexpected response from server".to_string(),
            });
        Self {
            kind: ErrorKind::Application,
            message,
            status,
        }
    }

    pub fn verification_required(message: Option<String>) -> Self {
        Self {
            kind: ErrorKind::VerificationRequired,
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Please verify your email address before signing in.".into()),
            status: Some(403),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::new(ErrorKind::Validation, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_prefers_server_message() {
        let e = ApiError::application(Some(400), Some("Insufficient balance".into()));
        assert_eq!(e.kind, ErrorKind::Application);
        assert_eq!(e.to_string(), "Insufficient balance");
        assert_eq!(e.status, Some(400));
    }

    #[test]
    fn application_falls_back_on_blank_message() {
        let e = ApiError::application(Some(500), Some("  ".into()));
        assert_eq!(e.to_string(), "Request failed (HTTP 500)");

        let e = ApiError::application(None, None);
        assert_eq!(e.to_string(), "Unexpected response from server");
    }

    #[test]
    fn connectivity_messages_are_distinct() {
        assert_ne!(ApiError::network().message, ApiError::timeout().message);
        assert_eq!(ApiError::network().kind, ErrorKind::Network);
        assert_eq!(ApiError::timeout().kind, ErrorKind::Timeout);
    }

    #[test]
    fn validation_errors_convert() {
        let e: ApiError = ValidationError::PasswordMismatch.into();
        assert_eq!(e.kind, ErrorKind::Validation);
        assert_eq!(e.message, ValidationError::PasswordMismatch.to_string());
    }
}
