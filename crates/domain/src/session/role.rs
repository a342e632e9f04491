//! Role claim carried in the token payload.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The privileged role name.
pub const ADMIN_ROLE: &str = "Admin";
/// The role assumed when the claim is missing.
pub const USER_ROLE: &str = "User";

/// Role of the signed-in user.
///
/// Role names are compared exactly; `"admin"` is not the admin role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// The privileged role.
    #[must_use]
    pub fn admin() -> Self {
        Self(ADMIN_ROLE.to_string())
    }

    /// The standard non-privileged role.
    #[must_use]
    pub fn user() -> Self {
        Self(USER_ROLE.to_string())
    }

    /// Builds a role from an optional claim value. Missing and empty claims
    /// fall back to the standard role.
    #[must_use]
    pub fn from_claim(claim: Option<&str>) -> Self {
        match claim {
            Some(name) if !name.is_empty() => Self(name.to_string()),
            _ => Self::user(),
        }
    }

    /// Returns the role name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the privileged role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0 == ADMIN_ROLE
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::user()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
