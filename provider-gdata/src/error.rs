//! Error types for the GData provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// GData provider errors
///
/// Building elements never fails; these come from XML encoding/decoding and
/// from remote calls.
#[derive(Error, Debug)]
pub enum GDataError {
    /// Malformed XML, or a tree that cannot be written
    #[error("XML error: {0}")]
    Xml(String),

    /// No response was obtained from the transport
    #[error("Transport failure: {0}")]
    Transport(#[from] BridgeError),

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Malformed entry or bad parameters (HTTP 400)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The entry changed since the supplied ETag was read (HTTP 412)
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("GData API error (status {status_code}): {message}")]
    Api { status_code: u16, message: String },
}

pub type Result<T> = std::result::Result<T, GDataError>;

impl GDataError {
    pub(crate) fn xml(error: impl std::fmt::Display) -> Self {
        GDataError::Xml(error.to_string())
    }

    /// Classify a non-success response
    pub fn from_status(status_code: u16, body: &[u8], resource: &str) -> Self {
        let message = String::from_utf8_lossy(body).trim().to_string();

        match status_code {
            400 => GDataError::InvalidArgument(message),
            401 => GDataError::Unauthorized(message),
            403 => GDataError::Forbidden(message),
            404 => GDataError::NotFound {
                resource: resource.to_string(),
            },
            412 => GDataError::PreconditionFailed(message),
            _ => GDataError::Api {
                status_code,
                message,
            },
        }
    }
}

impl From<GDataError> for BridgeError {
    fn from(error: GDataError) -> Self {
        match error {
            GDataError::Transport(e) => e,
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            GDataError::from_status(412, b"Mismatch: etags = [W/\"abc\"]", "entry"),
            GDataError::PreconditionFailed(_)
        ));
        assert!(matches!(
            GDataError::from_status(401, b"Token invalid", "entry"),
            GDataError::Unauthorized(_)
        ));

        match GDataError::from_status(400, b"Invalid request URI\n", "entry") {
            GDataError::InvalidArgument(message) => assert_eq!(message, "Invalid request URI"),
            other => panic!("unexpected error: {:?}", other),
        }

        match GDataError::from_status(404, b"Not Found", "https://example.com/feeds/1") {
            GDataError::NotFound { resource } => {
                assert_eq!(resource, "https://example.com/feeds/1")
            }
            other => panic!("unexpected error: {:?}", other),
        }

        match GDataError::from_status(503, b" Service Unavailable \n", "entry") {
            GDataError::Api {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 503);
                assert_eq!(message, "Service Unavailable");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_transport_error_unwrapped() {
        let error = GDataError::Transport(BridgeError::Timeout("10s".to_string()));
        assert!(matches!(BridgeError::from(error), BridgeError::Timeout(_)));
    }
}
