//! Request and result types for the send pipeline.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::NotificationError;

/// Serialized payload ceiling; the APNs side of the backend enforces
/// roughly this limit downstream, so oversized payloads are rejected
/// before the network call.
pub const MAX_PAYLOAD_BYTES: usize = 4096;

/// User-visible notification content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    /// Custom key-value data attached verbatim to the outbound message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, String>>,
}

impl NotificationPayload {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: HashMap<String, String>) -> Self {
        self.data = Some(data);
        self
    }
}

/// Delivery hints layered onto a payload.
///
/// Everything here is optional; unset fields stay off the wire rather
/// than being defaulted into the message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationOptions {
    /// Badge count; negative values are rejected.
    pub badge: Option<i64>,
    pub sound: Option<String>,
    /// Delivery urgency. Absent behaves like [`Priority::High`].
    pub priority: Option<Priority>,
    #[serde(default)]
    pub content_available: bool,
    #[serde(default)]
    pub mutable_content: bool,
}

/// Delivery urgency accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Normal,
}

impl FromStr for Priority {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "normal" => Ok(Self::Normal),
            _ => Err(NotificationError::invalid_options(
                "Priority must be either \"high\" or \"normal\"",
            )),
        }
    }
}

/// Terminal per-send outcome. `send` resolves every failure path into
/// one of these; it never raises past the public boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendResult {
    pub fn delivered(message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: Some(message_id.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}
