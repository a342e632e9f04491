//! Navigation port

use async_trait::async_trait;
use stratus_domain::Route;

/// Moves the client to another route.
///
/// `goto` resolves once navigation has been initiated; guards and the
/// authenticated fetch await it before reporting their outcome.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Navigates to `route`.
    async fn goto(&self, route: &Route);
}
