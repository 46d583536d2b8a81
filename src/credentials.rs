//! Service-account credential loading and validation.
//!
//! A credential descriptor is a JSON file carrying the vendor's service
//! account material. Three fields are mandatory and must be non-empty
//! strings; everything else is kept verbatim for the token signer.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::InitError;

/// Env var consulted when no credential path is supplied.
pub const SERVICE_ACCOUNT_PATH_ENV: &str = "FIREBASE_SERVICE_ACCOUNT_PATH";

/// Env var consulted when no handle name is supplied.
pub const APP_NAME_ENV: &str = "FIREBASE_APP_NAME";

/// Fallback path used when neither an argument nor the env var is set.
pub const DEFAULT_SERVICE_ACCOUNT_PATH: &str = "./firebase-service-account.json";

const REQUIRED_FIELDS: [&str; 3] = ["project_id", "private_key", "client_email"];

/// Parsed service-account descriptor.
///
/// Only the fields this crate reads are broken out; the raw document is
/// retained so the token signer sees the full credential material.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(skip)]
    raw: String,
}

impl ServiceAccount {
    /// Load and validate a service-account file.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] when the file is absent, unreadable, not
    /// valid JSON, or missing any required field. The missing-fields
    /// variant lists every absent field, not just the first.
    pub fn load(path: &Path) -> Result<Self, InitError> {
        if !path.exists() {
            return Err(InitError::CredentialsNotFound {
                path: path.to_path_buf(),
            });
        }

        let raw = fs::read_to_string(path).map_err(|source| InitError::CredentialsRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw, path)
    }

    fn from_json(raw: &str, path: &Path) -> Result<Self, InitError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|source| InitError::CredentialsParse {
                path: path.to_path_buf(),
                source,
            })?;

        // An empty string counts as missing, same as an absent key.
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| {
                value
                    .get(**field)
                    .and_then(|v| v.as_str())
                    .map_or(true, str::is_empty)
            })
            .map(|field| field.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(InitError::MissingFields {
                path: path.to_path_buf(),
                fields: missing,
            });
        }

        let mut account: ServiceAccount =
            serde_json::from_value(value).map_err(|source| InitError::CredentialsParse {
                path: path.to_path_buf(),
                source,
            })?;
        account.raw = raw.to_string();
        Ok(account)
    }

    /// Full JSON document, as read from disk.
    pub fn raw_json(&self) -> &str {
        &self.raw
    }
}

/// Resolve the credential path: explicit argument, then the
/// `FIREBASE_SERVICE_ACCOUNT_PATH` env var, then the default location.
pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| env::var_os(SERVICE_ACCOUNT_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SERVICE_ACCOUNT_PATH))
}
