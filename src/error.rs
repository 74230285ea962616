//! Error types for the dashboard client

use reqwest::StatusCode;
use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    /// No access token was stored. The session has already been cleared.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The backend kept rejecting credentials after one refresh attempt.
    /// The session has already been cleared.
    #[error("Unauthorized - token refresh failed")]
    Unauthorized,

    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Backend { status: StatusCode, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Whether this error means the session is gone and the user was sent to login.
    ///
    /// UI layers should not display these as raw errors.
    pub fn is_session_ended(&self) -> bool {
        matches!(self, ClientError::NotAuthenticated | ClientError::Unauthorized)
    }

    /// HTTP status of a backend rejection, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Backend { status, .. } => Some(*status),
            ClientError::Network(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ended_classification() {
        assert!(ClientError::NotAuthenticated.is_session_ended());
        assert!(ClientError::Unauthorized.is_session_ended());

        let backend = ClientError::Backend {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        assert!(!backend.is_session_ended());
        assert_eq!(backend.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!ClientError::InvalidRequest("bad".into()).is_session_ended());
    }

    #[test]
    fn test_backend_error_display() {
        let err = ClientError::Backend {
            status: StatusCode::NOT_FOUND,
            body: "{\"detail\":\"missing\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Backend returned 404 Not Found: {\"detail\":\"missing\"}"
        );
    }
}
