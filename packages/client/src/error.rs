//! Client error types
use itms_core::ApiError;
use thiserror::Error;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures surfaced by the transport and every operation built on it
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with an error body (or a status we could not decode)
    #[error("API error ({status}): {error}")]
    Api { status: u16, error: ApiError },

    /// Unauthenticated or forbidden, and the one refresh attempt did not help
    #[error("Authentication error: {0}")]
    Auth(ApiError),

    #[error("Not found: {0}")]
    NotFound(ApiError),

    /// The backend refused a status change from the record's current status
    #[error("Invalid status transition: {0}")]
    InvalidTransition(ApiError),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Reading or writing the persisted token pair failed
    #[error("Token storage error: {0}")]
    Storage(String),
}

/// Coarse classification of a [`ClientError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Api,
    Auth,
    NotFound,
    InvalidTransition,
    Timeout,
    Network,
    InvalidResponse,
    Configuration,
    Storage,
}

impl ClientError {
    /// Create an authentication error without a backend body
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(ApiError::new("AUTH_REQUIRED", msg))
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a token storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Api { .. } => ErrorKind::Api,
            ClientError::Auth(_) => ErrorKind::Auth,
            ClientError::NotFound(_) => ErrorKind::NotFound,
            ClientError::InvalidTransition(_) => ErrorKind::InvalidTransition,
            ClientError::Timeout => ErrorKind::Timeout,
            ClientError::Network(_) => ErrorKind::Network,
            ClientError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            ClientError::Configuration(_) => ErrorKind::Configuration,
            ClientError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Check if this is a network-related error
    pub fn is_network_error(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Timeout)
    }

    /// Check if this is an authentication error
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::Auth(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    /// The backend error record, when the failure came from the backend
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api { error, .. }
            | ClientError::Auth(error)
            | ClientError::NotFound(error)
            | ClientError::InvalidTransition(error) => Some(error),
            _ => None,
        }
    }

    /// Message suitable for a banner or an inline form error
    pub fn user_message(&self) -> String {
        match self.api_error() {
            Some(error) => error.message.clone(),
            None => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_predicates() {
        let auth_error = ClientError::auth("No refresh token");
        assert!(auth_error.is_auth_error());
        assert!(!auth_error.is_network_error());
        assert_eq!(auth_error.kind(), ErrorKind::Auth);

        assert!(ClientError::Timeout.is_network_error());
        assert!(ClientError::Network("reset".to_string()).is_network_error());
        assert!(ClientError::NotFound(ApiError::new("PJ001", "gone")).is_not_found());
    }

    #[test]
    fn test_user_message_prefers_backend_message() {
        let error = ClientError::Api {
            status: 400,
            error: ApiError::new("C001", "Invalid input"),
        };
        assert_eq!(error.user_message(), "Invalid input");
        assert_eq!(error.to_string(), "API error (400): Invalid input (C001)");

        assert_eq!(ClientError::Timeout.user_message(), "Request timed out");
        assert!(ClientError::config("bad").api_error().is_none());
    }
}
