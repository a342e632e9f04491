//! Login use case.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stratus_domain::{ApiBaseUrl, RequestSpec, SessionToken, SessionUser};
use thiserror::Error;
use tracing::info;

use crate::ports::{HttpClient, HttpClientError, StorageError};
use crate::session::Session;

/// Login endpoint path.
pub const LOGIN_PATH: &str = "/login";

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Credentials sent to the login endpoint.
#[derive(Clone, Serialize)]
pub struct LoginInput {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Output from a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutput {
    /// Identity decoded from the new token, when its payload decodes.
    pub user: Option<SessionUser>,
}

/// Errors from the login use case.
#[derive(Debug, Error)]
pub enum LoginError {
    /// The server rejected the username or password.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The server answered with an unexpected status.
    #[error("login failed with status {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server error message, or the raw body.
        message: String,
    },

    /// A success response did not carry a usable token.
    #[error("malformed login response: {0}")]
    MalformedResponse(String),

    /// The credentials could not be encoded.
    #[error("could not encode credentials: {0}")]
    Encode(String),

    /// No response was received.
    #[error(transparent)]
    Transport(#[from] HttpClientError),

    /// The token could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// Exchanges credentials for a session token and stores it.
pub struct Login<C: HttpClient> {
    client: Arc<C>,
    session: Session,
    base_url: ApiBaseUrl,
}

impl<C: HttpClient> Login<C> {
    /// Creates a new `Login` use case.
    pub const fn new(client: Arc<C>, session: Session, base_url: ApiBaseUrl) -> Self {
        Self {
            client,
            session,
            base_url,
        }
    }

    /// Posts the credentials and stores the returned token.
    ///
    /// # Errors
    /// - `InvalidCredentials` on 401
    /// - `MalformedResponse` if a 2xx body has no token
    /// - `Rejected` for any other status
    /// - `Transport` / `Storage` when the request or the token write fails
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, LoginError> {
        let request = RequestSpec::post_json(self.base_url.join(LOGIN_PATH), &input)
            .map_err(|e| LoginError::Encode(e.to_string()))?;

        let response = self.client.execute(&request).await?;

        if response.is_unauthorized() {
            return Err(LoginError::InvalidCredentials(
                response
                    .error_message()
                    .unwrap_or_else(|| INVALID_CREDENTIALS.to_string()),
            ));
        }

        if !response.is_success() {
            return Err(LoginError::Rejected {
                status: response.status,
                message: response
                    .error_message()
                    .unwrap_or_else(|| response.text().into_owned()),
            });
        }

        let body: LoginResponse = response
            .json()
            .map_err(|e| LoginError::MalformedResponse(e.to_string()))?;
        let token = SessionToken::new(body.token)
            .ok_or_else(|| LoginError::MalformedResponse("empty token".to_string()))?;

        let user = token.claims().ok().map(|claims| claims.session_user());
        self.session.tokens().set(Some(token)).await?;

        info!(username = %input.username, "signed in");
        Ok(LoginOutput { user })
    }
}
