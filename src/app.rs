//! Backend handle lifecycle.
//!
//! Handles are registered by name and immutable after construction.
//! Two lifecycle modes exist: a process-wide default (first successful
//! [`initialize`] wins, later calls get the cached handle back) and
//! factory mode, where each call may register an independently named
//! handle carrying its own credentials.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use gcp_auth::CustomServiceAccount;
use once_cell::sync::{Lazy, OnceCell};
use tracing::{debug, info};

use crate::credentials::{self, ServiceAccount, APP_NAME_ENV};
use crate::errors::InitError;
use crate::messaging::{HttpTransport, Messaging};

/// Name given to the process-wide default handle.
pub const DEFAULT_APP_NAME: &str = "[DEFAULT]";

const HTTP_TIMEOUT_SECS: u64 = 30;

static REGISTRY: Lazy<RwLock<HashMap<String, Arc<App>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));
static DEFAULT_APP: OnceCell<Arc<App>> = OnceCell::new();

/// Ready-to-use handle to the messaging backend.
///
/// Read-only after construction, so a single handle can serve any
/// number of concurrent sends without extra locking.
pub struct App {
    name: String,
    account: ServiceAccount,
    signer: Arc<CustomServiceAccount>,
    http: reqwest::Client,
}

impl App {
    fn new(name: String, account: ServiceAccount) -> Result<Self, InitError> {
        let signer = CustomServiceAccount::from_json(account.raw_json())
            .map_err(|e| InitError::backend_with_source("failed to construct token signer", e))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| InitError::backend_with_source("failed to create HTTP client", e))?;

        Ok(Self {
            name,
            account,
            signer: Arc::new(signer),
            http,
        })
    }

    /// Registered name of this handle.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Project id from the credential descriptor.
    pub fn project_id(&self) -> &str {
        &self.account.project_id
    }

    /// Messaging interface bound to this handle.
    pub fn messaging(&self) -> Messaging {
        Messaging::new(HttpTransport::new(
            self.http.clone(),
            self.account.project_id.clone(),
            Arc::clone(&self.signer),
        ))
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keeps the private key out of logs.
        f.debug_struct("App")
            .field("name", &self.name)
            .field("project_id", &self.account.project_id)
            .finish()
    }
}

/// Optional settings for [`initialize`].
#[derive(Debug, Clone, Default)]
pub struct InitConfig {
    pub service_account_path: Option<PathBuf>,
    pub app_name: Option<String>,
}

/// Whether the process-wide default handle exists.
pub fn is_initialized() -> bool {
    DEFAULT_APP.get().is_some()
}

/// The process-wide default handle, if [`initialize`] has succeeded.
pub fn default_app() -> Option<Arc<App>> {
    DEFAULT_APP.get().cloned()
}

/// Initialize (or return) the process-wide default handle.
///
/// The first successful call wins: every later call returns the cached
/// handle and its arguments are ignored, even when they name a
/// different credential file. Concurrent first calls may redundantly
/// build a handle; exactly one wins the cache and the rest are dropped.
///
/// # Errors
///
/// Returns [`InitError`] when the credential file at the resolved path
/// is absent, unparsable or incomplete, or backend construction fails.
pub fn initialize(config: Option<InitConfig>) -> Result<Arc<App>, InitError> {
    if let Some(app) = DEFAULT_APP.get() {
        return Ok(Arc::clone(app));
    }

    let config = config.unwrap_or_default();
    let path = credentials::resolve_path(config.service_account_path);
    let name = resolve_app_name(config.app_name);

    let app = get_or_create(&path, &name)?;
    let app = DEFAULT_APP.get_or_init(|| app);
    Ok(Arc::clone(app))
}

/// Return the handle registered under `name`, or load credentials from
/// `path` and register a new one.
///
/// Idempotent by name: when a handle with this name already exists it
/// is returned as-is and `path` is not consulted.
pub fn get_or_create(path: &Path, name: &str) -> Result<Arc<App>, InitError> {
    {
        let registry = REGISTRY.read().expect("handle registry lock poisoned");
        if let Some(app) = registry.get(name) {
            debug!(app = name, "reusing registered messaging handle");
            return Ok(Arc::clone(app));
        }
    }

    let account = ServiceAccount::load(path)?;
    let app = Arc::new(App::new(name.to_string(), account)?);

    let mut registry = REGISTRY.write().expect("handle registry lock poisoned");
    // Recheck under the write lock: a concurrent creator may have won.
    let app = registry.entry(name.to_string()).or_insert(app);
    info!(app = name, project_id = %app.project_id(), "registered messaging handle");
    Ok(Arc::clone(app))
}

/// Resolve the handle name: explicit argument, then the
/// `FIREBASE_APP_NAME` env var, then [`DEFAULT_APP_NAME`].
pub fn resolve_app_name(explicit: Option<String>) -> String {
    explicit
        .or_else(|| std::env::var(APP_NAME_ENV).ok())
        .unwrap_or_else(|| DEFAULT_APP_NAME.to_string())
}

/// Unique handle name for factory mode, from a millisecond timestamp
/// and a random suffix.
pub(crate) fn unique_app_name() -> String {
    format!(
        "app-{}-{:04x}",
        Utc::now().timestamp_millis(),
        rand::random::<u16>()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_path() -> PathBuf {
        PathBuf::from(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/service-account.json"
        ))
    }

    #[test]
    fn test_registry_idempotent_by_name() {
        let first = get_or_create(&fixture_path(), "test-registry-app").expect("create handle");
        // Second call with a bogus path must return the registered
        // handle without touching the filesystem.
        let second =
            get_or_create(Path::new("./does-not-exist.json"), "test-registry-app").expect("reuse");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.project_id(), "demo-project");
    }

    #[test]
    fn test_distinct_names_distinct_handles() {
        let a = get_or_create(&fixture_path(), "test-app-a").expect("create a");
        let b = get_or_create(&fixture_path(), "test-app-b").expect("create b");
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.name(), "test-app-a");
        assert_eq!(b.name(), "test-app-b");
    }

    #[test]
    fn test_singleton_ignores_later_arguments() {
        let config = InitConfig {
            service_account_path: Some(fixture_path()),
            app_name: Some("test-default".to_string()),
        };
        let first = initialize(Some(config)).expect("first initialize");
        assert!(is_initialized());

        // Later call with arguments pointing nowhere still returns the
        // cached handle instead of failing.
        let second = initialize(Some(InitConfig {
            service_account_path: Some(PathBuf::from("./nope.json")),
            app_name: Some("other".to_string()),
        }))
        .expect("second initialize");
        assert!(Arc::ptr_eq(&first, &second));

        let third = initialize(None).expect("third initialize");
        assert!(Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_unique_app_names_differ() {
        let a = unique_app_name();
        let b = unique_app_name();
        assert_ne!(a, b);
        assert!(a.starts_with("app-"));
    }

    #[test]
    fn test_debug_omits_private_key() {
        let app = get_or_create(&fixture_path(), "test-debug-app").expect("create handle");
        let rendered = format!("{app:?}");
        assert!(rendered.contains("demo-project"));
        assert!(!rendered.contains("PRIVATE KEY"));
    }
}
