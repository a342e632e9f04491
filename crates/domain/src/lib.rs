//! Stratus Domain - Core session types
//!
//! This crate defines the domain model for the Stratus client session layer:
//! session tokens and their claims, routes, the execution context flag and
//! the HTTP request/response shapes. All types here are pure Rust with no
//! I/O dependencies.

pub mod context;
pub mod endpoint;
pub mod error;
pub mod request;
pub mod response;
pub mod route;
pub mod session;

pub use context::ExecutionContext;
pub use endpoint::{ApiBaseUrl, DEFAULT_API_BASE_URL};
pub use error::{DomainError, DomainResult};
pub use request::{CONTENT_TYPE_JSON, Header, Headers, HttpMethod, RequestSpec};
pub use response::ResponseSpec;
pub use route::{Route, RouteArea};
pub use session::{
    ADMIN_ROLE, Role, SessionToken, SessionUser, TokenClaims, TokenDecodeError, USER_ROLE,
};
