//! Authenticated fetch.
//!
//! Sends requests to the API with the session token attached as a bearer
//! credential. A missing token or a 401 response ends the session: the
//! client is sent back to the landing route and the caller gets an error
//! instead of a response.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use stratus_domain::{
    ApiBaseUrl, CONTENT_TYPE_JSON, Headers, HttpMethod, RequestSpec, ResponseSpec, Route,
    SessionToken,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::ports::{HttpClient, HttpClientError, StorageError};
use crate::session::Session;

/// Errors returned by [`AuthenticatedFetch`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Called outside a client context.
    #[error("authenticated fetch can only be used in a client context")]
    WrongContext,

    /// No session token was present. The client has been redirected.
    #[error("no session token found")]
    MissingCredential,

    /// The server rejected the token. The session was cleared and the
    /// client redirected.
    #[error("unauthorized")]
    Unauthorized,

    /// The token could not be cleared after a rejection.
    #[error("failed to clear session: {0}")]
    Storage(#[from] StorageError),

    /// No response was received.
    #[error(transparent)]
    Transport(#[from] HttpClientError),

    /// A JSON helper got a non-success status.
    #[error("request failed with status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server error message, or the raw body.
        message: String,
    },

    /// A JSON helper could not encode the request or decode the response.
    #[error("invalid JSON: {0}")]
    Json(String),
}

/// Method, headers and body of a request made through [`AuthenticatedFetch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// HTTP method.
    pub method: HttpMethod,
    /// Caller headers, merged with the bearer header.
    pub headers: Headers,
    /// Optional request body.
    pub body: Option<Vec<u8>>,
}

impl FetchOptions {
    /// Options for a request with the given method and nothing else.
    #[must_use]
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Sets a raw body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a JSON-encoded body.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn json<T: Serialize>(self, value: &T) -> serde_json::Result<Self> {
        Ok(self.body(serde_json::to_vec(value)?))
    }
}

/// Sends requests to the API on behalf of the signed-in user.
pub struct AuthenticatedFetch<C: HttpClient> {
    session: Session,
    client: Arc<C>,
    base_url: ApiBaseUrl,
}

impl<C: HttpClient> AuthenticatedFetch<C> {
    /// Creates a fetcher for the API at `base_url`.
    pub const fn new(session: Session, client: Arc<C>, base_url: ApiBaseUrl) -> Self {
        Self {
            session,
            client,
            base_url,
        }
    }

    /// Returns the API base address.
    #[must_use]
    pub const fn base_url(&self) -> &ApiBaseUrl {
        &self.base_url
    }

    /// Sends a request to `path` (appended to the base address).
    ///
    /// Every response except 401 is returned as-is, error statuses included.
    ///
    /// # Errors
    ///
    /// - `WrongContext` outside a client context.
    /// - `MissingCredential` when there is no token, after redirecting to `/`.
    /// - `Unauthorized` on a 401, after clearing the token and redirecting to `/`.
    /// - `Storage` if the token could not be cleared after a 401.
    /// - `Transport` if no response was received.
    pub async fn fetch(
        &self,
        path: &str,
        options: FetchOptions,
    ) -> Result<ResponseSpec, FetchError> {
        if !self.session.context().is_client() {
            return Err(FetchError::WrongContext);
        }

        let Some(token) = self.session.tokens().read() else {
            self.session.redirect(&Route::landing()).await;
            return Err(FetchError::MissingCredential);
        };

        let request = self.build_request(path, options, &token);
        debug!(method = %request.method, url = %request.url, "sending authenticated request");

        let response = self.client.execute(&request).await?;

        if response.is_unauthorized() {
            let cleared = self.session.tokens().clear().await;
            if let Err(error) = &cleared {
                warn!(%error, "failed to clear rejected session token");
            }
            self.session.redirect(&Route::landing()).await;
            cleared?;
            return Err(FetchError::Unauthorized);
        }

        Ok(response)
    }

    /// GETs `path` and decodes a JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`fetch`](Self::fetch), plus `Status` for non-2xx responses
    /// and `Json` for undecodable bodies.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let response = self.fetch(path, FetchOptions::new(HttpMethod::Get)).await?;
        Self::decode(&response)
    }

    /// POSTs a JSON body to `path` and decodes a JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`get_json`](Self::get_json).
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let options = FetchOptions::new(HttpMethod::Post)
            .json(body)
            .map_err(|e| FetchError::Json(e.to_string()))?;
        let response = self.fetch(path, options).await?;
        Self::decode(&response)
    }

    fn build_request(
        &self,
        path: &str,
        options: FetchOptions,
        token: &SessionToken,
    ) -> RequestSpec {
        let mut headers = options.headers;
        headers.set("Authorization", token.bearer_header_value());
        if options.body.is_some() && !headers.contains("Content-Type") {
            headers.set("Content-Type", CONTENT_TYPE_JSON);
        }

        RequestSpec {
            method: options.method,
            url: self.base_url.join(path),
            headers,
            body: options.body,
        }
    }

    fn decode<T: DeserializeOwned>(response: &ResponseSpec) -> Result<T, FetchError> {
        if !response.is_success() {
            return Err(FetchError::Status {
                status: response.status,
                message: response
                    .error_message()
                    .unwrap_or_else(|| response.text().into_owned()),
            });
        }
        response.json().map_err(|e| FetchError::Json(e.to_string()))
    }
}
