//! Naive decoding of the token payload.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::{Role, SessionUser};

/// Errors that can occur while decoding a token payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenDecodeError {
    /// The token has no second `.`-separated segment.
    #[error("token has no payload segment")]
    MissingPayload,

    /// The payload segment is not valid base64.
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded payload is not JSON, or is `null`.
    #[error("payload is not valid JSON: {0}")]
    Json(String),
}

/// Claims read from the token payload.
///
/// Claims are read leniently: unknown claims are ignored and a claim of an
/// unexpected type is treated as absent (a non-string `sub` is kept in its
/// JSON text form). Nothing here is verified: the signature is never checked
/// and `exp` is informational only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TokenClaims {
    /// Subject identifier.
    pub sub: Option<String>,
    /// Raw role claim, when it is a string.
    pub role: Option<String>,
    /// Display username, when the issuer includes one.
    pub username: Option<String>,
    /// Expiry as unix seconds.
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Decodes the payload segment of a `header.payload.signature` token.
    ///
    /// Both the URL-safe and the standard base64 alphabets are accepted,
    /// with or without padding.
    ///
    /// # Errors
    ///
    /// Returns `TokenDecodeError` if the payload segment is missing, is not
    /// base64, is not JSON, or is JSON `null`. Any other JSON value decodes;
    /// payloads that are not objects simply carry no claims.
    pub fn decode(token: &str) -> Result<Self, TokenDecodeError> {
        let payload = token
            .split('.')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .ok_or(TokenDecodeError::MissingPayload)?;

        let normalized: String = payload
            .trim_end_matches('=')
            .chars()
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                other => other,
            })
            .collect();

        let bytes = URL_SAFE_NO_PAD.decode(normalized.as_bytes())?;
        let payload: Value =
            serde_json::from_slice(&bytes).map_err(|e| TokenDecodeError::Json(e.to_string()))?;
        if payload.is_null() {
            return Err(TokenDecodeError::Json("payload is null".to_string()));
        }

        Ok(Self::from_payload(&payload))
    }

    fn from_payload(payload: &Value) -> Self {
        let string = |name: &str| {
            payload
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let sub = match payload.get("sub") {
            None | Some(Value::Null) => None,
            Some(Value::String(sub)) => Some(sub.clone()),
            Some(other) => Some(other.to_string()),
        };

        Self {
            sub,
            role: string("role"),
            username: string("username"),
            exp: payload.get("exp").and_then(lenient_seconds),
        }
    }

    /// Returns the role claim, defaulting to the standard role.
    #[must_use]
    pub fn role(&self) -> Role {
        Role::from_claim(self.role.as_deref())
    }

    /// Returns the expiry as a timestamp, if present and representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Returns the identity exposed to views: `sub` as username, plus role.
    #[must_use]
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            username: self.sub.clone(),
            role: self.role(),
        }
    }
}

/// Reads unix seconds from an integer, a float (truncated) or a numeric string.
#[allow(clippy::cast_possible_truncation)]
fn lenient_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|secs| secs.is_finite() && secs.abs() < 9.0e15)
                .map(|secs| secs.trunc() as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
