//! Notification construction, validation and submission.
//!
//! The pipeline is: validate token, payload and options (first failure
//! wins and skips the network call), build the wire message, submit it
//! once, and translate any backend failure into a uniform
//! [`SendResult`]. Nothing in here raises past `send`.

pub mod message;
pub mod transport;
pub mod types;
pub mod validate;

pub use message::{build_message, Message};
pub use transport::{HttpTransport, MessageTransport};
pub use types::{
    NotificationOptions, NotificationPayload, Priority, SendResult, MAX_PAYLOAD_BYTES,
};
pub use validate::{validate_device_token, validate_options, validate_payload};

use std::sync::Arc;

use tracing::{error, info};

use crate::errors::TransportError;

/// Fixed translation table for known backend error codes. Unknown codes
/// pass the backend's own message through unchanged.
fn user_facing_error(err: &TransportError) -> String {
    match err.code.as_deref() {
        Some("UNREGISTERED") | Some("INVALID_REGISTRATION") => {
            "Invalid or unregistered device token".to_string()
        }
        Some("INVALID_ARGUMENT") => "Invalid notification payload or options".to_string(),
        Some("UNAUTHENTICATED") | Some("PERMISSION_DENIED") | Some("THIRD_PARTY_AUTH_ERROR") => {
            "Firebase authentication failed".to_string()
        }
        Some("UNAVAILABLE") => "Firebase messaging service is temporarily unavailable".to_string(),
        Some("INTERNAL") => "Internal Firebase error occurred".to_string(),
        _ => err.message.clone(),
    }
}

/// Messaging interface bound to one backend handle.
#[derive(Clone)]
pub struct Messaging {
    transport: Arc<dyn MessageTransport>,
}

impl Messaging {
    pub(crate) fn new(transport: HttpTransport) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Build a messaging interface over a custom transport.
    ///
    /// The seam exists so callers and tests can observe submissions
    /// without a network.
    pub fn with_transport(transport: Arc<dyn MessageTransport>) -> Self {
        Self { transport }
    }

    /// Validate, build and submit one notification.
    ///
    /// Never returns an error: every failure path, validation or
    /// backend, resolves to a [`SendResult`] with `success == false`.
    /// Each send is a single independent request; there is no retry.
    pub async fn send(
        &self,
        device_token: &str,
        payload: &NotificationPayload,
        options: Option<&NotificationOptions>,
    ) -> SendResult {
        let default_options = NotificationOptions::default();
        let options = options.unwrap_or(&default_options);

        let validation = validate::validate_device_token(device_token)
            .and_then(|()| validate::validate_payload(payload))
            .and_then(|()| validate::validate_options(options));
        if let Err(err) = validation {
            error!(code = ?err.code, "Notification validation failed: {}", err.message);
            return SendResult::failure(err.message);
        }

        let message = message::build_message(device_token, payload, options);
        match self.transport.submit(&message).await {
            Ok(message_id) => {
                info!(%message_id, "Notification sent");
                SendResult::delivered(message_id)
            }
            Err(err) => {
                let user_message = user_facing_error(&err);
                match err.code.as_deref() {
                    Some(code) => {
                        error!(code, "Notification send failed: {user_message}");
                    }
                    None => error!("Notification send failed: {user_message}"),
                }
                SendResult::failure(user_message)
            }
        }
    }
}
