//! Registration use case.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stratus_domain::{ApiBaseUrl, RequestSpec};
use thiserror::Error;

use crate::ports::{HttpClient, HttpClientError};

/// Registration endpoint path.
pub const REGISTER_PATH: &str = "/register";

/// New account details.
#[derive(Clone, Serialize)]
pub struct RegisterInput {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

/// Errors from the registration use case.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The username is already registered.
    #[error("username already taken")]
    UsernameTaken,

    /// The server refused the submitted details.
    #[error("invalid registration details: {0}")]
    InvalidInput(String),

    /// The server answered with an unexpected status.
    #[error("registration failed with status {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server error message, or the raw body.
        message: String,
    },

    /// The details could not be encoded.
    #[error("could not encode registration: {0}")]
    Encode(String),

    /// No response was received.
    #[error(transparent)]
    Transport(#[from] HttpClientError),
}

#[derive(Deserialize)]
struct RegisterResponse {
    message: String,
}

/// Creates a new account. Does not sign in.
pub struct Register<C: HttpClient> {
    client: Arc<C>,
    base_url: ApiBaseUrl,
}

impl<C: HttpClient> Register<C> {
    /// Creates a new `Register` use case.
    pub const fn new(client: Arc<C>, base_url: ApiBaseUrl) -> Self {
        Self { client, base_url }
    }

    /// Submits the registration and returns the server's confirmation.
    ///
    /// # Errors
    /// - `UsernameTaken` on 409
    /// - `InvalidInput` on 400
    /// - `Rejected` for any other non-2xx status
    /// - `Transport` if no response was received
    pub async fn execute(&self, input: RegisterInput) -> Result<String, RegisterError> {
        let request = RequestSpec::post_json(self.base_url.join(REGISTER_PATH), &input)
            .map_err(|e| RegisterError::Encode(e.to_string()))?;

        let response = self.client.execute(&request).await?;
        let message = response
            .error_message()
            .unwrap_or_else(|| response.text().into_owned());

        match response.status {
            409 => Err(RegisterError::UsernameTaken),
            400 => Err(RegisterError::InvalidInput(message)),
            status if !response.is_success() => Err(RegisterError::Rejected { status, message }),
            _ => Ok(response
                .json::<RegisterResponse>()
                .map_or_else(|_| "Registration successful".to_string(), |body| body.message)),
        }
    }
}
