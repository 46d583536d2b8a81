//! Error types for credential loading, request validation and submission.
//!
//! Initialization raises [`InitError`]; everything that happens during a
//! send is folded into a `SendResult` before it crosses the public
//! boundary, so [`NotificationError`] and [`TransportError`] never
//! escape from `send`.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure while loading credentials or constructing a backend handle.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Service account file not found at path: {}", path.display())]
    CredentialsNotFound { path: PathBuf },

    #[error("Failed to read service account file at {}: {source}", path.display())]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse service account JSON: {source}")]
    CredentialsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Service account JSON is missing required fields: {}", fields.join(", "))]
    MissingFields { path: PathBuf, fields: Vec<String> },

    #[error("Failed to initialize messaging backend: {message}")]
    Backend {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl InitError {
    /// Create a new Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new Backend error with source
    pub fn backend_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Credential file involved in the failure, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::CredentialsNotFound { path }
            | Self::CredentialsRead { path, .. }
            | Self::CredentialsParse { path, .. }
            | Self::MissingFields { path, .. } => Some(path),
            Self::Backend { .. } => None,
        }
    }
}

/// Machine-readable reason a request was rejected before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCode {
    InvalidToken,
    InvalidPayload,
    PayloadTooLarge,
    InvalidOptions,
}

/// Validation failure, produced locally and consumed by the send
/// pipeline. Carried in the failed `SendResult` as its message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct NotificationError {
    pub code: ValidationCode,
    pub message: String,
}

impl NotificationError {
    pub fn new(code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ValidationCode::InvalidToken, message)
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(ValidationCode::InvalidPayload, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ValidationCode::PayloadTooLarge, message)
    }

    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::new(ValidationCode::InvalidOptions, message)
    }
}

/// Failure reported by the messaging backend or the HTTP layer under it.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct TransportError {
    /// Backend error code (e.g. `UNREGISTERED`) when the response carried one.
    pub code: Option<String>,
    pub message: String,
}

impl TransportError {
    /// Failure with a backend error code attached.
    pub fn coded(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Failure without a backend code, e.g. a connection error.
    pub fn uncoded(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_error_display() {
        let err = InitError::CredentialsNotFound {
            path: PathBuf::from("./missing.json"),
        };
        assert_eq!(
            err.to_string(),
            "Service account file not found at path: ./missing.json"
        );
    }

    #[test]
    fn test_missing_fields_joined() {
        let err = InitError::MissingFields {
            path: PathBuf::from("./sa.json"),
            fields: vec!["private_key".to_string(), "client_email".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Service account JSON is missing required fields: private_key, client_email"
        );
    }

    #[test]
    fn test_init_error_path() {
        let err = InitError::CredentialsNotFound {
            path: PathBuf::from("./missing.json"),
        };
        assert_eq!(err.path(), Some(Path::new("./missing.json")));
        assert!(InitError::backend("boom").path().is_none());
    }

    #[test]
    fn test_notification_error_constructors() {
        let err = NotificationError::invalid_token("Device token must be a non-empty string");
        assert_eq!(err.code, ValidationCode::InvalidToken);
        assert_eq!(err.to_string(), "Device token must be a non-empty string");
    }

    #[test]
    fn test_transport_error_code() {
        let err = TransportError::coded("UNREGISTERED", "Requested entity was not found.");
        assert_eq!(err.code.as_deref(), Some("UNREGISTERED"));

        let err = TransportError::uncoded("connection refused");
        assert!(err.code.is_none());
    }
}
