//! Error types for Google Drive provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

use crate::types::ErrorResponse;

/// Google Drive provider errors
///
/// Remote failures are surfaced unchanged apart from being classified by
/// status code; nothing is retried or recovered here.
#[derive(Error, Debug)]
pub enum GoogleDriveError {
    /// Remote resource does not exist (HTTP 404)
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Bad ID, expired page token or malformed parameters (HTTP 400, or
    /// rejected locally before sending)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing or expired credentials (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Scope or sharing rules deny the operation (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Any other non-success status
    #[error("Google Drive API error (status {status_code}): {message}")]
    Api { status_code: u16, message: String },

    /// No response was obtained from the transport
    #[error("Transport failure: {0}")]
    Transport(#[from] BridgeError),

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// Reading upload content failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Google Drive operations
pub type Result<T> = std::result::Result<T, GoogleDriveError>;

impl GoogleDriveError {
    /// Classify a non-success response
    ///
    /// `resource` names what was addressed (a file ID, a permission path) so
    /// that a 404 reports something actionable.
    pub fn from_status(status_code: u16, body: &[u8], resource: &str) -> Self {
        let message = extract_message(body);

        match status_code {
            400 => GoogleDriveError::InvalidArgument(message),
            401 => GoogleDriveError::Unauthorized(message),
            403 => GoogleDriveError::Forbidden(message),
            404 => GoogleDriveError::NotFound {
                resource: resource.to_string(),
            },
            _ => GoogleDriveError::Api {
                status_code,
                message,
            },
        }
    }

    /// HTTP status this error was classified from, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GoogleDriveError::InvalidArgument(_) => Some(400),
            GoogleDriveError::Unauthorized(_) => Some(401),
            GoogleDriveError::Forbidden(_) => Some(403),
            GoogleDriveError::NotFound { .. } => Some(404),
            GoogleDriveError::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GoogleDriveError::NotFound { .. })
    }
}

/// Prefer the message from Google's JSON error envelope, fall back to the raw body
fn extract_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(response) if !response.error.message.is_empty() => response.error.message,
        _ => String::from_utf8_lossy(body).trim().to_string(),
    }
}

impl From<GoogleDriveError> for BridgeError {
    fn from(error: GoogleDriveError) -> Self {
        match error {
            GoogleDriveError::Transport(e) => e,
            GoogleDriveError::Io(e) => BridgeError::Io(e),
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = GoogleDriveError::Api {
            status_code: 500,
            message: "Backend Error".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Google Drive API error (status 500): Backend Error"
        );
    }

    #[test]
    fn test_status_classification() {
        let body = br#"{"error":{"errors":[{"domain":"global","reason":"notFound"}],"code":404,"message":"File not found: abc"}}"#;
        let error = GoogleDriveError::from_status(404, body, "abc");
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Resource not found: abc");

        let body = br#"{"error":{"code":400,"message":"Invalid Value"}}"#;
        match GoogleDriveError::from_status(400, body, "files") {
            GoogleDriveError::InvalidArgument(msg) => assert_eq!(msg, "Invalid Value"),
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(matches!(
            GoogleDriveError::from_status(401, b"", "files"),
            GoogleDriveError::Unauthorized(_)
        ));
        assert!(matches!(
            GoogleDriveError::from_status(403, b"", "files"),
            GoogleDriveError::Forbidden(_)
        ));
        assert_eq!(
            GoogleDriveError::from_status(418, b"teapot", "files").status_code(),
            Some(418)
        );
    }

    #[test]
    fn test_non_json_body_used_as_message() {
        match GoogleDriveError::from_status(502, b"Bad Gateway\n", "files") {
            GoogleDriveError::Api { message, .. } => assert_eq!(message, "Bad Gateway"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_conversion() {
        let error = GoogleDriveError::Unauthorized("Token expired".to_string());
        let bridge_error: BridgeError = error.into();

        assert!(matches!(bridge_error, BridgeError::OperationFailed(_)));

        let error = GoogleDriveError::Transport(BridgeError::Timeout("30s".to_string()));
        let bridge_error: BridgeError = error.into();
        assert!(matches!(bridge_error, BridgeError::Timeout(_)));
    }
}
