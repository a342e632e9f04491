//! Session token types.
//!
//! A session token is issued by the login endpoint and kept by the client.
//! The client never verifies it; it only decodes the payload segment to read
//! the subject and role claims.

mod claims;
mod role;
mod token;
mod user;

pub use claims::{TokenClaims, TokenDecodeError};
pub use role::{ADMIN_ROLE, Role, USER_ROLE};
pub use token::SessionToken;
pub use user::SessionUser;
