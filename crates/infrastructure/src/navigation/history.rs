//! Navigator that keeps a history of visited routes.
//!
//! Headless clients (the CLI, tests) have no page to move to, so navigation
//! is recorded and the latest entry is treated as the current location.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use stratus_application::ports::Navigator;
use stratus_domain::Route;
use tracing::info;

/// In-process navigation history.
#[derive(Debug)]
pub struct HistoryNavigator {
    history: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    /// Creates a navigator positioned at `start`.
    #[must_use]
    pub fn new(start: Route) -> Self {
        Self {
            history: Mutex::new(vec![start]),
        }
    }

    /// Returns the current route.
    #[must_use]
    pub fn current(&self) -> Route {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_else(Route::landing)
    }

    /// Returns every visited route, oldest first, starting with the initial one.
    #[must_use]
    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new(Route::landing())
    }
}

#[async_trait]
impl Navigator for HistoryNavigator {
    async fn goto(&self, route: &Route) {
        info!(%route, "navigate");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_records_navigation() {
        let navigator = HistoryNavigator::default();
        assert_eq!(navigator.current(), Route::landing());

        navigator.goto(&Route::files()).await;
        navigator.goto(&Route::admin()).await;

        assert_eq!(navigator.current(), Route::admin());
        assert_eq!(
            navigator.history(),
            vec![Route::landing(), Route::files(), Route::admin()]
        );
    }
}
