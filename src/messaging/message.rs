//! Outbound wire types for the FCM HTTP v1 `messages:send` call.
//!
//! Optional fields use `skip_serializing_if` so unset options are
//! omitted from the JSON entirely, never sent as null or zero.

use std::collections::HashMap;

use serde::Serialize;

use super::types::{NotificationOptions, NotificationPayload, Priority};

/// One message addressed to a single device token.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub token: String,
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, String>>,
    pub apns: ApnsConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// APNs extension block: urgency header plus the `aps` payload.
#[derive(Debug, Clone, Serialize)]
pub struct ApnsConfig {
    pub headers: ApnsHeaders,
    pub payload: ApnsPayload,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApnsHeaders {
    #[serde(rename = "apns-priority")]
    pub priority: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApnsPayload {
    pub aps: Aps,
}

#[derive(Debug, Clone, Serialize)]
pub struct Aps {
    pub alert: Alert,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(rename = "content-available", skip_serializing_if = "Option::is_none")]
    pub content_available: Option<u8>,
    #[serde(rename = "mutable-content", skip_serializing_if = "Option::is_none")]
    pub mutable_content: Option<u8>,
}

/// Alert mirror of the notification block.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub title: String,
    pub body: String,
}

/// Assemble the outbound message.
///
/// `Normal` priority maps to the `"5"` urgency header; `High` or absent
/// maps to `"10"`. The content-available and mutable-content flags
/// serialize as `1` when set and are omitted otherwise.
pub fn build_message(
    token: &str,
    payload: &NotificationPayload,
    options: &NotificationOptions,
) -> Message {
    let priority = match options.priority {
        Some(Priority::Normal) => "5",
        _ => "10",
    };

    Message {
        token: token.to_string(),
        notification: Notification {
            title: payload.title.clone(),
            body: payload.body.clone(),
        },
        data: payload.data.clone(),
        apns: ApnsConfig {
            headers: ApnsHeaders {
                priority: priority.to_string(),
            },
            payload: ApnsPayload {
                aps: Aps {
                    alert: Alert {
                        title: payload.title.clone(),
                        body: payload.body.clone(),
                    },
                    badge: options.badge,
                    sound: options.sound.clone(),
                    content_available: options.content_available.then_some(1),
                    mutable_content: options.mutable_content.then_some(1),
                },
            },
        },
    }
}
