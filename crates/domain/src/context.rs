//! Execution context flag.
//!
//! Guards, the token store and the authenticated fetch behave differently
//! depending on whether they run inside an interactive client (with access
//! to persistent storage and navigation) or somewhere else, such as a
//! server-side render pass. The flag is passed explicitly instead of being
//! probed from the environment.

use serde::{Deserialize, Serialize};

/// Where the session layer is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionContext {
    /// Interactive client with persistent storage and navigation.
    #[default]
    Client,
    /// Non-client context. Storage is never touched and guards allow everything.
    Server,
}

impl ExecutionContext {
    /// Returns true when running in a client context.
    #[must_use]
    pub const fn is_client(self) -> bool {
        matches!(self, Self::Client)
    }

    /// Returns the context as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

impl std::fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
