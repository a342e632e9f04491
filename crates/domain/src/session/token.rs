//! The opaque session token.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{TokenClaims, TokenDecodeError};

/// Bearer credential issued at login.
///
/// The value is never empty. `Debug` only shows a short preview so tokens
/// do not end up in logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw token. Empty or whitespace-only values are not tokens.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub fn bearer_header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Decodes the payload claims without verifying the signature.
    ///
    /// # Errors
    ///
    /// Returns `TokenDecodeError` if the payload cannot be decoded.
    pub fn claims(&self) -> Result<TokenClaims, TokenDecodeError> {
        TokenClaims::decode(&self.0)
    }

    /// Returns a short preview (first 8 chars + ...).
    #[must_use]
    pub fn preview(&self) -> String {
        if self.0.chars().count() > 12 {
            let head: String = self.0.chars().take(8).collect();
            format!("{head}...")
        } else {
            "***".to_string()
        }
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&self.preview()).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_are_not_tokens() {
        assert!(SessionToken::new("").is_none());
        assert!(SessionToken::new("   ").is_none());
        assert!(SessionToken::new("abc").is_some());
    }

    #[test]
    fn test_bearer_header_value() {
        let token = SessionToken::new("abc.def.ghi").unwrap();
        assert_eq!(token.bearer_header_value(), "Bearer abc.def.ghi");
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = SessionToken::new("eyJhbGciOiJIUzI1NiJ9.payload.signature").unwrap();
        let debug = format!("{token:?}");
        assert_eq!(debug, "SessionToken(\"eyJhbGci...\")");
        assert!(!debug.contains("signature"));

        let short = SessionToken::new("short").unwrap();
        assert_eq!(format!("{short:?}"), "SessionToken(\"***\")");
    }
}
