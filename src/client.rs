//! Public client surface: per-handle clients and one-call sending.

use std::path::Path;
use std::sync::Arc;

use tracing::error;

use crate::app::{self, App};
use crate::errors::InitError;
use crate::messaging::{Messaging, NotificationOptions, NotificationPayload, SendResult};

/// Notification client bound to one named backend handle.
pub struct NotificationClient {
    app: Arc<App>,
    messaging: Messaging,
}

impl NotificationClient {
    pub(crate) fn new(app: Arc<App>) -> Self {
        let messaging = app.messaging();
        Self { app, messaging }
    }

    /// Handle this client sends through.
    pub fn app(&self) -> &Arc<App> {
        &self.app
    }

    /// Send one notification. See [`Messaging::send`] for the contract.
    pub async fn send(
        &self,
        device_token: &str,
        payload: &NotificationPayload,
        options: Option<&NotificationOptions>,
    ) -> SendResult {
        self.messaging.send(device_token, payload, options).await
    }
}

/// Create a client in factory mode.
///
/// When `app_name` is `None`, a unique name is generated so repeated
/// calls yield independent handles usable concurrently with different
/// credentials. Passing an existing name returns a client over the
/// already-registered handle (its credentials win).
///
/// # Errors
///
/// Returns [`InitError`] when the credential file cannot be loaded or
/// the backend handle cannot be constructed.
pub fn create_client(
    service_account_path: impl AsRef<Path>,
    app_name: Option<String>,
) -> Result<NotificationClient, InitError> {
    let name = app_name.unwrap_or_else(app::unique_app_name);
    let app = app::get_or_create(service_account_path.as_ref(), &name)?;
    Ok(NotificationClient::new(app))
}

/// Send through the process-wide default handle, initializing it from
/// the environment on first use.
///
/// Never raises: even an initialization failure is folded into the
/// failed [`SendResult`].
pub async fn send(
    device_token: &str,
    payload: &NotificationPayload,
    options: Option<&NotificationOptions>,
) -> SendResult {
    let app = match app::initialize(None) {
        Ok(app) => app,
        Err(err) => {
            error!("Notification send failed: {err}");
            return SendResult::failure(err.to_string());
        }
    };
    app.messaging().send(device_token, payload, options).await
}
