//! Submission to the FCM HTTP v1 endpoint.
//!
//! [`MessageTransport`] is the seam between request construction and
//! the wire; tests swap in a recording implementation.

use std::sync::Arc;

use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::errors::TransportError;

use super::message::Message;

const MESSAGING_SCOPE: &[&str] = &["https://www.googleapis.com/auth/firebase.messaging"];

static DEFAULT_ENDPOINT: Lazy<Url> = Lazy::new(|| {
    Url::parse("https://fcm.googleapis.com").expect("default endpoint URL is well-formed")
});

/// Hands one constructed message to the backend.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Submit a single message; returns the backend-assigned message name.
    async fn submit(&self, message: &Message) -> Result<String, TransportError>;
}

/// Production transport: one authenticated POST per message, no retry.
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    project_id: String,
    signer: Arc<CustomServiceAccount>,
}

impl HttpTransport {
    pub fn new(client: Client, project_id: String, signer: Arc<CustomServiceAccount>) -> Self {
        Self {
            client,
            endpoint: DEFAULT_ENDPOINT.clone(),
            project_id,
            signer,
        }
    }

    /// Point the transport at an alternate base URL, e.g. a local emulator.
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    fn send_url(&self) -> Result<Url, TransportError> {
        self.endpoint
            .join(&format!("v1/projects/{}/messages:send", self.project_id))
            .map_err(|e| TransportError::uncoded(format!("Invalid messaging endpoint: {e}")))
    }
}

#[async_trait]
impl MessageTransport for HttpTransport {
    async fn submit(&self, message: &Message) -> Result<String, TransportError> {
        let token = self
            .signer
            .token(MESSAGING_SCOPE)
            .await
            .map_err(|e| TransportError::uncoded(format!("Failed to obtain access token: {e}")))?;

        let url = self.send_url()?;
        debug!(%url, "submitting message");

        let response = self
            .client
            .post(url)
            .bearer_auth(token.as_str())
            .json(&SendRequest { message })
            .send()
            .await
            .map_err(|e| {
                TransportError::uncoded(format!("Failed to reach messaging backend: {e}"))
            })?;

        let status = response.status();
        if status.is_success() {
            let body: SendResponse = response.json().await.map_err(|e| {
                TransportError::uncoded(format!("Malformed backend response: {e}"))
            })?;
            Ok(body.name)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(parse_error_response(status, &body))
        }
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    message: &'a Message,
}

#[derive(Deserialize)]
struct SendResponse {
    /// Fully qualified message name, `projects/*/messages/{id}`.
    name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorPayload,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

/// Extract a coded [`TransportError`] from a non-success response body.
fn parse_error_response(status: StatusCode, body: &str) -> TransportError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => {
            let code = fcm_error_code(&parsed.error);
            let message = if parsed.error.message.is_empty() {
                format!("Messaging backend returned HTTP {status}")
            } else {
                parsed.error.message
            };
            TransportError { code, message }
        }
        Err(_) => {
            TransportError::uncoded(format!("Messaging backend returned HTTP {status}: {body}"))
        }
    }
}

/// Prefer the FcmError detail code; fall back to the RPC status.
fn fcm_error_code(error: &ErrorPayload) -> Option<String> {
    for detail in &error.details {
        let is_fcm_error = detail
            .get("@type")
            .and_then(|v| v.as_str())
            .is_some_and(|t| t.ends_with("FcmError"));
        if is_fcm_error {
            if let Some(code) = detail.get("errorCode").and_then(|v| v.as_str()) {
                return Some(code.to_string());
            }
        }
    }
    error.status.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_with_fcm_detail_code() {
        let body = r#"{
            "error": {
                "code": 404,
                "message": "Requested entity was not found.",
                "status": "NOT_FOUND",
                "details": [{
                    "@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
                    "errorCode": "UNREGISTERED"
                }]
            }
        }"#;
        let err = parse_error_response(StatusCode::NOT_FOUND, body);
        assert_eq!(err.code.as_deref(), Some("UNREGISTERED"));
        assert_eq!(err.message, "Requested entity was not found.");
    }

    #[test]
    fn test_parse_error_falls_back_to_rpc_status() {
        let body = r#"{
            "error": {
                "code": 503,
                "message": "The service is currently unavailable.",
                "status": "UNAVAILABLE"
            }
        }"#;
        let err = parse_error_response(StatusCode::SERVICE_UNAVAILABLE, body);
        assert_eq!(err.code.as_deref(), Some("UNAVAILABLE"));
    }

    #[test]
    fn test_parse_error_non_json_body() {
        let err = parse_error_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(err.code.is_none());
        assert!(err.message.contains("502"));
        assert!(err.message.contains("bad gateway"));
    }

    #[test]
    fn test_parse_error_empty_message_uses_status_line() {
        let body = r#"{"error": {"status": "INTERNAL"}}"#;
        let err = parse_error_response(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert_eq!(err.code.as_deref(), Some("INTERNAL"));
        assert!(err.message.contains("500"));
    }
}
