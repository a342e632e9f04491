//! The user exposed to views inside the admin area.

use serde::{Deserialize, Serialize};

use super::Role;

/// Identity decoded from the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Subject identifier (`sub` claim), if the token carries one.
    pub username: Option<String>,
    /// Role claim, defaulting to the standard role.
    pub role: Role,
}

impl SessionUser {
    /// Creates a session user.
    #[must_use]
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: Some(username.into()),
            role,
        }
    }

    /// Returns true if the user holds the privileged role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
