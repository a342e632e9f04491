//! Logout use case.

use stratus_domain::Route;
use tracing::info;

use crate::ports::StorageError;
use crate::session::Session;

/// Ends the session and returns to the landing route.
#[derive(Debug, Clone)]
pub struct Logout {
    session: Session,
}

impl Logout {
    /// Creates a new `Logout` use case.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Clears the token and navigates to `/`.
    ///
    /// The redirect happens even if clearing fails.
    ///
    /// # Errors
    /// Returns an error if the persisted token cannot be removed.
    pub async fn execute(&self) -> Result<(), StorageError> {
        let cleared = self.session.tokens().clear().await;
        self.session.redirect(&Route::landing()).await;
        cleared?;
        info!("signed out");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::session::TOKEN_STORAGE_KEY;
    use crate::testing::{MemoryStore, RecordingNavigator};
    use pretty_assertions::assert_eq;
    use stratus_domain::ExecutionContext;

    #[tokio::test]
    async fn test_logout_clears_token_and_redirects() {
        let storage = Arc::new(MemoryStore::with_entry(TOKEN_STORAGE_KEY, "tok"));
        let navigator = Arc::new(RecordingNavigator::new());
        let session = Session::start(ExecutionContext::Client, storage.clone(), navigator.clone())
            .await
            .unwrap();

        Logout::new(session.clone()).execute().await.unwrap();

        assert_eq!(session.tokens().read(), None);
        assert!(!storage.contains(TOKEN_STORAGE_KEY));
        assert_eq!(navigator.visited(), vec![Route::landing()]);
    }
}
