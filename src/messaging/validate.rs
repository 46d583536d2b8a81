//! Request validation ahead of submission.
//!
//! Plain functions returning `Result`, consumed directly by the send
//! pipeline. First failure wins; the caller short-circuits the
//! remaining checks and the network call.

use crate::errors::NotificationError;

use super::types::{NotificationOptions, NotificationPayload, MAX_PAYLOAD_BYTES};

/// Reject empty or all-whitespace device tokens.
pub fn validate_device_token(token: &str) -> Result<(), NotificationError> {
    if token.trim().is_empty() {
        return Err(NotificationError::invalid_token(
            "Device token must be a non-empty string",
        ));
    }
    Ok(())
}

/// Reject blank titles/bodies and payloads over the serialized size limit.
pub fn validate_payload(payload: &NotificationPayload) -> Result<(), NotificationError> {
    if payload.title.trim().is_empty() {
        return Err(NotificationError::invalid_payload(
            "Notification title is required and must be a non-empty string",
        ));
    }
    if payload.body.trim().is_empty() {
        return Err(NotificationError::invalid_payload(
            "Notification body is required and must be a non-empty string",
        ));
    }

    let serialized = serde_json::to_string(payload).map_err(|e| {
        NotificationError::invalid_payload(format!("Notification payload is not serializable: {e}"))
    })?;
    if serialized.len() > MAX_PAYLOAD_BYTES {
        return Err(NotificationError::payload_too_large(format!(
            "Notification payload exceeds size limit ({} bytes > {} bytes)",
            serialized.len(),
            MAX_PAYLOAD_BYTES
        )));
    }

    Ok(())
}

/// Reject negative badge counts.
///
/// Priority needs no check here: [`super::types::Priority`] only parses
/// the two accepted values, so an invalid priority is caught at the
/// string boundary with the same user-facing message.
pub fn validate_options(options: &NotificationOptions) -> Result<(), NotificationError> {
    if let Some(badge) = options.badge {
        if badge < 0 {
            return Err(NotificationError::invalid_options(
                "Badge must be a positive number",
            ));
        }
    }
    Ok(())
}
