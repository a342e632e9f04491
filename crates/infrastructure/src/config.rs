//! Client configuration.
//!
//! Settings come from environment variables:
//! - `STRATUS_API_URL`: API base address (default `http://localhost:8080`)
//! - `STRATUS_STORAGE_PATH`: storage file (default: platform data dir)
//! - `STRATUS_TIMEOUT_MS`: request timeout in milliseconds (default 30000)

use std::path::PathBuf;
use std::time::Duration;

use stratus_domain::{ApiBaseUrl, DomainError};
use thiserror::Error;

use crate::adapters::DEFAULT_TIMEOUT;
use crate::persistence::FileKeyValueStore;

/// Environment variable holding the API base address.
pub const ENV_API_URL: &str = "STRATUS_API_URL";
/// Environment variable holding the storage file path.
pub const ENV_STORAGE_PATH: &str = "STRATUS_STORAGE_PATH";
/// Environment variable holding the request timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "STRATUS_TIMEOUT_MS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API address is not a valid http(s) URL.
    #[error("STRATUS_API_URL: {0}")]
    ApiUrl(#[from] DomainError),

    /// The timeout is not a positive integer.
    #[error("STRATUS_TIMEOUT_MS must be a positive number of milliseconds, got '{0}'")]
    Timeout(String),

    /// No storage path was configured and the platform has no data directory.
    #[error("could not determine a storage location; set STRATUS_STORAGE_PATH")]
    NoStorageDir,
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base address.
    pub api_base_url: ApiBaseUrl,
    /// Storage file for the session token.
    pub storage_path: PathBuf,
    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through a variable lookup function.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_base_url = match var(ENV_API_URL) {
            Some(raw) => ApiBaseUrl::parse(&raw)?,
            None => ApiBaseUrl::default(),
        };

        let storage_path = match var(ENV_STORAGE_PATH) {
            Some(raw) => PathBuf::from(raw),
            None => FileKeyValueStore::default_path().ok_or(ConfigError::NoStorageDir)?,
        };

        let timeout = match var(ENV_TIMEOUT_MS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or(ConfigError::Timeout(raw))?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            api_base_url,
            storage_path,
            timeout,
        })
    }
}
