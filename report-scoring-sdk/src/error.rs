//! SDK error types and handling
//!
//! Every failure surfaces as an [`SdkError`]. The important split is between
//! [`SdkError::Network`] / [`SdkError::Timeout`] (no response was received)
//! and [`SdkError::Api`] (the backend answered with a non-2xx status).

use std::time::Duration;
use thiserror::Error;

pub use report_scoring_core::error::{FieldError, ValidationErrors};

/// The main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// The backend answered with a non-2xx status
    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        /// Structured error body, when the backend sent JSON
        body: Option<serde_json::Value>,
    },

    /// No response was received
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Local validation rejected the request before it was sent
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Local file error during upload or download
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

impl SdkError {
    /// Build an API error from a non-2xx response body.
    ///
    /// The backend reports failures as `{"error": "..."}`; some endpoints
    /// use `{"message": "..."}` instead. Anything else is kept as raw text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();

        let message = parsed
            .as_ref()
            .and_then(|v| {
                v.get("error")
                    .or_else(|| v.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                let text = body.trim();
                if text.is_empty() {
                    reqwest::StatusCode::from_u16(status)
                        .ok()
                        .and_then(|s| s.canonical_reason())
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    text.to_string()
                }
            });

        SdkError::Api {
            status,
            message,
            body: parsed,
        }
    }

    /// Whether no response was received
    pub fn is_network(&self) -> bool {
        matches!(self, SdkError::Network(_) | SdkError::Timeout(_))
    }

    /// Get the HTTP status code if the backend answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self.status_code(), Some(400..=499))
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self.status_code(), Some(500..=599))
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_from_backend_error_body() {
        let error = SdkError::from_response(404, r#"{"error": "File not found"}"#);

        match &error {
            SdkError::Api { status, message, body } => {
                assert_eq!(*status, 404);
                assert_eq!(message, "File not found");
                assert!(body.is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(error.is_not_found());
        assert!(error.is_client_error());
    }

    #[test]
    fn test_error_from_message_body() {
        let error = SdkError::from_response(404, r#"{"message": "No score yet"}"#);
        assert_eq!(error.to_string(), "API error: 404 - No score yet");
    }

    #[test]
    fn test_error_from_plain_text() {
        let error = SdkError::from_response(502, "Bad gateway from proxy\n");
        match error {
            SdkError::Api { message, body, .. } => {
                assert_eq!(message, "Bad gateway from proxy");
                assert!(body.is_none());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_from_empty_body_uses_reason() {
        let error = SdkError::from_response(503, "");
        assert_eq!(error.to_string(), "API error: 503 - Service Unavailable");
        assert!(error.is_server_error());
    }

    #[test]
    fn test_timeout_is_network() {
        let error = SdkError::Timeout(Duration::from_secs(10));
        assert!(error.is_network());
        assert_eq!(error.status_code(), None);
        assert_eq!(error.to_string(), "Request timed out after 10s");
    }

    #[test]
    fn test_validation_error_display() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::new("accuracy", "must be between 0 and 100, got 120"));
        let error = SdkError::from(errors);

        assert!(!error.is_network());
        assert_eq!(
            error.to_string(),
            "Validation error: accuracy: must be between 0 and 100, got 120"
        );
    }
}
