//! Push-notification client for Firebase Cloud Messaging.
//!
//! Validates device tokens, payloads and delivery options, shapes the
//! FCM HTTP v1 message, and translates backend failures into a uniform
//! [`SendResult`]. Backend handles are registered by name; a
//! process-wide default supports one-call sending.
//!
//! ```no_run
//! use fcm_notify::{create_client, NotificationPayload};
//!
//! # async fn demo() -> Result<(), fcm_notify::InitError> {
//! let client = create_client("/path/to/service-account.json", None)?;
//! let result = client
//!     .send("device-token", &NotificationPayload::new("Hello", "World"), None)
//!     .await;
//! assert!(result.success || result.error.is_some());
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod messaging;

pub use app::{default_app, initialize, is_initialized, App, InitConfig, DEFAULT_APP_NAME};
pub use client::{create_client, send, NotificationClient};
pub use credentials::ServiceAccount;
pub use errors::{InitError, NotificationError, TransportError, ValidationCode};
pub use messaging::{
    Messaging, NotificationOptions, NotificationPayload, Priority, SendResult, MAX_PAYLOAD_BYTES,
};
