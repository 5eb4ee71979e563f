//! Error types for the gymdesk client.

use thiserror::Error;

/// Fallback message when an error body is not JSON.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Errors that can occur while talking to the gymdesk backend.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// Non-2xx response. `message` is what the user sees.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("{0}")]
    Invalid(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Build a `Server` error from a status code and raw response body.
    ///
    /// - body is JSON with an `error` string: that string, verbatim
    /// - body is JSON without one: "HTTP error! status: <code>"
    /// - body is not JSON: "An error occurred"
    pub fn from_response_body(status: u16, body: &[u8]) -> Self {
        let message = match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(value) => match value.get("error").and_then(|e| e.as_str()) {
                Some(msg) if !msg.is_empty() => msg.to_string(),
                _ => format!("HTTP error! status: {}", status),
            },
            Err(_) => GENERIC_ERROR_MESSAGE.to_string(),
        };

        ApiError::Server { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Result type alias for gymdesk operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_is_used_verbatim() {
        let err = ApiError::from_response_body(404, br#"{"error": "Member not found"}"#);
        assert_eq!(err.to_string(), "Member not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn json_without_error_field_mentions_status() {
        let err = ApiError::from_response_body(500, br#"{"message": "boom"}"#);
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[test]
    fn non_json_body_falls_back_to_generic_message() {
        let err = ApiError::from_response_body(502, b"<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn empty_body_falls_back_to_generic_message() {
        let err = ApiError::from_response_body(500, b"");
        assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
    }
}
