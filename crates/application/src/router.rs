//! Guarded navigation.

use stratus_domain::{DomainResult, Route};
use tracing::debug;

use crate::guard::{GuardOutcome, guard_for};
use crate::session::Session;

/// Runs the guard of a route's area before navigating to it.
#[derive(Debug, Clone)]
pub struct Router {
    session: Session,
}

impl Router {
    /// Creates a router for a session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Navigates to `route` if its guard allows it.
    ///
    /// When the guard redirects, the redirect has already happened and the
    /// requested route is not visited.
    pub async fn enter(&self, route: &Route) -> GuardOutcome {
        let area = route.area();
        let outcome = match guard_for(area) {
            Some(guard) => guard.check(&self.session).await,
            None => GuardOutcome::allow(),
        };

        debug!(%route, ?area, allowed = outcome.is_allowed(), "navigation checked");

        if outcome.is_allowed() {
            self.session.navigator().goto(route).await;
        }
        outcome
    }

    /// Parses `path` and navigates to it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRoute` if `path` is not absolute.
    pub async fn enter_path(&self, path: &str) -> DomainResult<GuardOutcome> {
        let route = Route::parse(path)?;
        Ok(self.enter(&route).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::session::TOKEN_STORAGE_KEY;
    use crate::testing::{MemoryStore, RecordingNavigator, token_with_claims};
    use pretty_assertions::assert_eq;
    use stratus_domain::ExecutionContext;

    async fn router_with(token: Option<&str>) -> (Router, Arc<RecordingNavigator>) {
        let storage = token.map_or_else(MemoryStore::new, |t| {
            MemoryStore::with_entry(TOKEN_STORAGE_KEY, t)
        });
        let navigator = Arc::new(RecordingNavigator::new());
        let session = Session::start(
            ExecutionContext::Client,
            Arc::new(storage),
            navigator.clone(),
        )
        .await
        .unwrap();
        (Router::new(session), navigator)
    }

    #[tokio::test]
    async fn test_public_routes_need_no_session() {
        let (router, navigator) = router_with(None).await;

        let outcome = router.enter_path("/register").await.unwrap();

        assert!(outcome.is_allowed());
        assert_eq!(navigator.visited(), vec![Route::parse("/register").unwrap()]);
    }

    #[tokio::test]
    async fn test_protected_route_without_session_lands_on_home() {
        let (router, navigator) = router_with(None).await;

        let outcome = router.enter_path("/files/photos").await.unwrap();

        assert_eq!(outcome, GuardOutcome::Redirected(Route::landing()));
        assert_eq!(navigator.visited(), vec![Route::landing()]);
    }

    #[tokio::test]
    async fn test_admin_route_for_regular_user_lands_on_files() {
        let token = token_with_claims(r#"{"sub":"bob","role":"User"}"#);
        let (router, navigator) = router_with(Some(&token)).await;

        let outcome = router.enter_path("/admin/users").await.unwrap();

        assert_eq!(outcome, GuardOutcome::Redirected(Route::files()));
        assert_eq!(navigator.visited(), vec![Route::files()]);
    }

    #[tokio::test]
    async fn test_dot_segments_cannot_skip_the_admin_guard() {
        let token = token_with_claims(r#"{"sub":"bob","role":"User"}"#);
        let (router, navigator) = router_with(Some(&token)).await;

        let outcome = router.enter_path("/files/../admin").await.unwrap();

        assert_eq!(outcome, GuardOutcome::Redirected(Route::files()));
        assert_eq!(navigator.visited(), vec![Route::files()]);
    }

    #[tokio::test]
    async fn test_admin_route_for_admin_is_visited() {
        let token = token_with_claims(r#"{"sub":"root","role":"Admin"}"#);
        let (router, navigator) = router_with(Some(&token)).await;

        let outcome = router.enter(&Route::admin()).await;

        assert_eq!(outcome.user().and_then(|u| u.username.as_deref()), Some("root"));
        assert_eq!(navigator.visited(), vec![Route::admin()]);
    }

    #[tokio::test]
    async fn test_relative_path_is_rejected() {
        let (router, navigator) = router_with(None).await;

        assert!(router.enter_path("files").await.is_err());
        assert!(navigator.visited().is_empty());
    }
}
