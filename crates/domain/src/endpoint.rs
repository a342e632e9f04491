//! Base address of the Stratus API.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Default API address used when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Validated base address that request paths are appended to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiBaseUrl(String);

impl ApiBaseUrl {
    /// Parses and validates a base address.
    ///
    /// Only `http` and `https` are accepted. A trailing slash is dropped so
    /// that joining `/path` never produces `//path`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` for malformed or non-HTTP addresses.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let raw = raw.trim();
        let url = Url::parse(raw).map_err(|e| DomainError::InvalidUrl(format!("{e}: {raw}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "unsupported scheme '{}': {raw}",
                url.scheme()
            )));
        }

        Ok(Self(raw.trim_end_matches('/').to_string()))
    }

    /// Returns the base address as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends a request path to the base address.
    ///
    /// Paths are taken verbatim; a missing leading slash is added.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with('/') {
            format!("{}{path}", self.0)
        } else {
            format!("{}/{path}", self.0)
        }
    }
}

impl Default for ApiBaseUrl {
    fn default() -> Self {
        Self(DEFAULT_API_BASE_URL.to_string())
    }
}

impl fmt::Display for ApiBaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ApiBaseUrl {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        Self::parse(&value)
    }
}

impl From<ApiBaseUrl> for String {
    fn from(base: ApiBaseUrl) -> Self {
        base.0
    }
}
