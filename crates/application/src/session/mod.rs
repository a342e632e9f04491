//! Session state.
//!
//! A [`Session`] is constructed once when the client starts and handed to
//! guards, the authenticated fetch and use cases. It bundles the execution
//! context, the token store and the navigator.

mod token_store;

use std::fmt;
use std::sync::Arc;

use stratus_domain::{ExecutionContext, Route, SessionUser};
use tracing::info;

use crate::ports::{KeyValueStore, Navigator, StorageError};

pub use token_store::{Subscription, TOKEN_STORAGE_KEY, TokenStore};

/// Client session: context flag, token store and navigator.
#[derive(Clone)]
pub struct Session {
    context: ExecutionContext,
    tokens: TokenStore,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    /// Starts a session, loading the persisted token when in a client context.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted token cannot be read.
    pub async fn start(
        context: ExecutionContext,
        storage: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, StorageError> {
        let tokens = TokenStore::load(storage, context).await?;
        Ok(Self {
            context,
            tokens,
            navigator,
        })
    }

    /// Returns the execution context.
    #[must_use]
    pub const fn context(&self) -> ExecutionContext {
        self.context
    }

    /// Returns the token store.
    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Returns the navigator.
    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Navigates away because the current route is not allowed.
    pub async fn redirect(&self, route: &Route) {
        info!(target = %route, "redirecting");
        self.navigator.goto(route).await;
    }

    /// Decodes the current token into a user, if there is a decodable token.
    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        let token = self.tokens.read()?;
        token.claims().ok().map(|claims| claims.session_user())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("context", &self.context)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
