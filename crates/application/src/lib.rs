//! Stratus Application - Session layer and use cases
//!
//! This crate defines the application layer with:
//! - Port traits (storage, navigation, HTTP transport)
//! - The session: persisted, observable token store
//! - Authenticated fetch, route guards and the guarded router
//! - Login, registration and logout use cases

pub mod fetch;
pub mod guard;
pub mod ports;
pub mod router;
pub mod session;
pub mod use_cases;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod testing;

pub use fetch::{AuthenticatedFetch, FetchError, FetchOptions};
pub use guard::{AdminGuard, GuardData, GuardOutcome, ProtectedGuard, RouteGuard, guard_for};
pub use ports::{HttpClient, HttpClientError, KeyValueStore, Navigator, StorageError};
pub use router::Router;
pub use session::{Session, Subscription, TOKEN_STORAGE_KEY, TokenStore};
pub use use_cases::{
    LOGIN_PATH, Login, LoginError, LoginInput, LoginOutput, Logout, REGISTER_PATH, Register,
    RegisterError, RegisterInput,
};
