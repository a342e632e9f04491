//! Composition root.
//!
//! Wires the session layer to the file-backed store, the reqwest client and
//! a history-recording navigator.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use stratus_application::{
    AuthenticatedFetch, FetchOptions, GuardOutcome, Login, LoginError, LoginInput, LoginOutput,
    Logout, Register, RegisterError, RegisterInput, Router, Session, StorageError,
};
use stratus_domain::{
    ApiBaseUrl, ExecutionContext, Header, HttpMethod, ResponseSpec, Route, SessionUser,
};
use stratus_infrastructure::{ClientConfig, FileKeyValueStore, HistoryNavigator, ReqwestHttpClient};

/// A client session bound to concrete adapters.
#[derive(Debug)]
pub struct App {
    session: Session,
    navigator: Arc<HistoryNavigator>,
    client: Arc<ReqwestHttpClient>,
    base_url: ApiBaseUrl,
}

impl App {
    /// Builds the adapters and loads the persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the storage
    /// file cannot be read.
    pub async fn start(config: &ClientConfig) -> Result<Self> {
        let client = ReqwestHttpClient::new(config.timeout).context("building HTTP client")?;
        let storage = Arc::new(FileKeyValueStore::new(config.storage_path.clone()));
        let navigator = Arc::new(HistoryNavigator::default());

        let session = Session::start(ExecutionContext::Client, storage, navigator.clone())
            .await
            .with_context(|| format!("loading session from {}", config.storage_path.display()))?;

        Ok(Self {
            session,
            navigator,
            client: Arc::new(client),
            base_url: config.api_base_url.clone(),
        })
    }

    /// Returns the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the route the client currently shows.
    #[must_use]
    pub fn location(&self) -> Route {
        self.navigator.current()
    }

    /// Signs in.
    ///
    /// # Errors
    ///
    /// See [`LoginError`].
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutput, LoginError> {
        Login::new(self.client.clone(), self.session.clone(), self.base_url.clone())
            .execute(LoginInput {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await
    }

    /// Creates an account and returns the server's confirmation.
    ///
    /// # Errors
    ///
    /// See [`RegisterError`].
    pub async fn register(&self, input: RegisterInput) -> Result<String, RegisterError> {
        Register::new(self.client.clone(), self.base_url.clone())
            .execute(input)
            .await
    }

    /// Signs out.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored token cannot be removed.
    pub async fn logout(&self) -> Result<(), StorageError> {
        Logout::new(self.session.clone()).execute().await
    }

    /// Describes the current session.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        let Some(token) = self.session.tokens().read() else {
            return SessionStatus::SignedOut;
        };
        match token.claims() {
            Ok(claims) => SessionStatus::SignedIn {
                user: claims.session_user(),
                token_preview: token.preview(),
                expires_at: claims.expires_at(),
            },
            Err(_) => SessionStatus::Unreadable {
                token_preview: token.preview(),
            },
        }
    }

    /// Opens a route through its guard and returns where the client ended up.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not an absolute route.
    pub async fn open(&self, path: &str) -> Result<GuardOutcome> {
        let outcome = Router::new(self.session.clone())
            .enter_path(path)
            .await
            .with_context(|| format!("cannot open '{path}'"))?;
        Ok(outcome)
    }

    /// Sends an authenticated GET request.
    ///
    /// # Errors
    ///
    /// See [`FetchError`](stratus_application::FetchError). Header lines that
    /// do not parse are rejected before anything is sent.
    pub async fn get(&self, path: &str, headers: &[String]) -> Result<ResponseSpec> {
        let mut options = FetchOptions::new(HttpMethod::Get);
        for line in headers {
            let header = Header::parse(line)?;
            options = options.header(header.name, header.value);
        }
        let fetch = AuthenticatedFetch::new(
            self.session.clone(),
            self.client.clone(),
            self.base_url.clone(),
        );
        let response = fetch.fetch(path, options).await?;
        Ok(response)
    }
}

/// What `stratus status` reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// No token is stored.
    SignedOut,
    /// A token is stored and its payload decodes.
    SignedIn {
        /// Decoded identity.
        user: SessionUser,
        /// Shortened token for display.
        token_preview: String,
        /// `exp` claim, informational only.
        expires_at: Option<DateTime<Utc>>,
    },
    /// A token is stored but its payload does not decode.
    Unreadable {
        /// Shortened token for display.
        token_preview: String,
    },
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignedOut => write!(f, "not signed in"),
            Self::SignedIn {
                user,
                token_preview,
                expires_at,
            } => {
                writeln!(
                    f,
                    "signed in as {}",
                    user.username.as_deref().unwrap_or("<unknown>")
                )?;
                writeln!(f, "role:    {}", user.role.as_str())?;
                write!(f, "token:   {token_preview}")?;
                if let Some(expires_at) = expires_at {
                    write!(f, "\nexpires: {}", expires_at.to_rfc3339())?;
                }
                Ok(())
            }
            Self::Unreadable { token_preview } => {
                write!(f, "a token is stored but cannot be read ({token_preview})")
            }
        }
    }
}
