//! Route guards.
//!
//! A guard runs once per navigation into a protected subtree, before
//! anything inside it is shown. It either allows the navigation or sends
//! the client elsewhere.

use async_trait::async_trait;
use stratus_domain::{Route, RouteArea, SessionUser};
use tracing::{debug, warn};

use crate::session::Session;

/// Data a guard hands to the views of the subtree it allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardData {
    /// The decoded user, exposed by the admin guard.
    pub user: Option<SessionUser>,
}

/// Result of running a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Navigation may proceed.
    Allowed(GuardData),
    /// The client was sent to another route; navigation does not complete.
    Redirected(Route),
}

impl GuardOutcome {
    /// Allows navigation without exposing any data.
    #[must_use]
    pub fn allow() -> Self {
        Self::Allowed(GuardData::default())
    }

    /// Returns true if navigation may proceed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }

    /// Returns the exposed user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Allowed(GuardData { user: Some(user) }) => Some(user),
            _ => None,
        }
    }

    /// Returns the redirect target, if the guard redirected.
    #[must_use]
    pub const fn redirect_target(&self) -> Option<&Route> {
        match self {
            Self::Redirected(route) => Some(route),
            Self::Allowed(_) => None,
        }
    }
}

/// Pre-navigation check for a route subtree.
#[async_trait]
pub trait RouteGuard: Send + Sync {
    /// Decides whether navigation into the subtree may proceed, performing
    /// any redirect itself.
    async fn check(&self, session: &Session) -> GuardOutcome;
}

/// Guard for the general protected area: a token must be present.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtectedGuard;

/// Guard for the admin area: the token must carry the admin role.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminGuard;

async fn redirect(session: &Session, route: Route) -> GuardOutcome {
    session.redirect(&route).await;
    GuardOutcome::Redirected(route)
}

#[async_trait]
impl RouteGuard for ProtectedGuard {
    async fn check(&self, session: &Session) -> GuardOutcome {
        if !session.context().is_client() {
            return GuardOutcome::allow();
        }

        if session.tokens().read().is_none() {
            return redirect(session, Route::landing()).await;
        }

        GuardOutcome::allow()
    }
}

#[async_trait]
impl RouteGuard for AdminGuard {
    async fn check(&self, session: &Session) -> GuardOutcome {
        if !session.context().is_client() {
            return GuardOutcome::allow();
        }

        let Some(token) = session.tokens().read() else {
            return redirect(session, Route::landing()).await;
        };

        // An undecodable payload counts as no token at all.
        let claims = match token.claims() {
            Ok(claims) => claims,
            Err(error) => {
                warn!(%error, token = ?token, "session token payload could not be decoded");
                return redirect(session, Route::landing()).await;
            }
        };

        let user = claims.session_user();
        if !user.is_admin() {
            debug!(role = %user.role, "admin area requires the admin role");
            return redirect(session, Route::files()).await;
        }

        GuardOutcome::Allowed(GuardData { user: Some(user) })
    }
}

static PROTECTED_GUARD: ProtectedGuard = ProtectedGuard;
static ADMIN_GUARD: AdminGuard = AdminGuard;

/// Returns the guard for a route area. Public areas have none.
#[must_use]
pub fn guard_for(area: RouteArea) -> Option<&'static dyn RouteGuard> {
    match area {
        RouteArea::Public => None,
        RouteArea::Protected => Some(&PROTECTED_GUARD),
        RouteArea::Admin => Some(&ADMIN_GUARD),
    }
}
