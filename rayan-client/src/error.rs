//! Client error types

use http::StatusCode;
use thiserror::Error;

use crate::form::ValidationErrors;

/// Message used when the server gives no usable failure text
pub const GENERIC_FAILURE: &str = "Request failed";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request never produced a response (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("Request failed ({status}): {message}")]
    Http { status: StatusCode, message: String },

    /// 2xx response whose envelope reports `success: false`
    #[error("API error: {message}")]
    Api { message: String },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Draft failed client-side validation; nothing was sent
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// Operation is not valid in the current screen state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local I/O (token store, attachment files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Text suitable for a user-facing notice
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http { message, .. } | ClientError::Api { message } => message.clone(),
            ClientError::Transport(e) if e.is_timeout() => "Request timed out".to_string(),
            ClientError::Transport(_) => "Network error, please try again".to_string(),
            ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
                "Unexpected response from server".to_string()
            }
            ClientError::Validation(errors) => errors.to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        ClientError::Validation(errors)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ClientError::Http {
            status: StatusCode::CONFLICT,
            message: "Code already used".to_string(),
        };
        assert_eq!(err.user_message(), "Code already used");
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));

        let err = ClientError::InvalidResponse("missing field `items`".to_string());
        assert_eq!(err.user_message(), "Unexpected response from server");
        assert!(err.status().is_none());
    }

    #[test]
    fn test_validation_conversion() {
        let mut errors = ValidationErrors::new();
        errors.push("code", "is required");
        let err: ClientError = errors.into();
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "code: is required");
    }
}
