//! Navigation routes and the areas they belong to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Path of the unauthenticated landing route.
pub const LANDING_PATH: &str = "/";
/// Path of the default route for signed-in users.
pub const FILES_PATH: &str = "/files";
/// Path of the admin area.
pub const ADMIN_PATH: &str = "/admin";

/// Access requirements of a route subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteArea {
    /// Reachable without a session.
    Public,
    /// Requires a session token.
    Protected,
    /// Requires a session token carrying the admin role.
    Admin,
}

/// An absolute navigation target, e.g. `/files/photos`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Route(String);

impl Route {
    /// The unauthenticated landing route (`/`).
    #[must_use]
    pub fn landing() -> Self {
        Self(LANDING_PATH.to_string())
    }

    /// The default authenticated landing route (`/files`).
    #[must_use]
    pub fn files() -> Self {
        Self(FILES_PATH.to_string())
    }

    /// The admin area root (`/admin`).
    #[must_use]
    pub fn admin() -> Self {
        Self(ADMIN_PATH.to_string())
    }

    /// Parses an absolute route path.
    ///
    /// The path part is normalized: `.` and empty segments are dropped and
    /// `..` removes the previous segment, so `/files/../admin` becomes
    /// `/admin`. A query or fragment is kept as written.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRoute` if the path does not start with `/`.
    pub fn parse(path: &str) -> DomainResult<Self> {
        let path = path.trim();
        if !path.starts_with('/') {
            return Err(DomainError::InvalidRoute(path.to_string()));
        }
        Ok(Self(normalize(path)))
    }

    /// Returns the route path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.0
    }

    /// Classifies the route into the subtree that guards it.
    #[must_use]
    pub fn area(&self) -> RouteArea {
        if is_within(&self.0, ADMIN_PATH) {
            RouteArea::Admin
        } else if is_within(&self.0, FILES_PATH) {
            RouteArea::Protected
        } else {
            RouteArea::Public
        }
    }
}

fn normalize(path: &str) -> String {
    let split = path.find(['?', '#']).unwrap_or(path.len());
    let (path, suffix) = path.split_at(split);

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    format!("/{}{suffix}", segments.join("/"))
}

/// True when `path` is `root` itself or below it (`/files`, `/files/x`, `/files?q`).
fn is_within(path: &str, root: &str) -> bool {
    path.strip_prefix(root)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']))
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Route {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Route {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        Self::parse(&value)
    }
}

impl From<Route> for String {
    fn from(route: Route) -> Self {
        route.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fixed_routes() {
        assert_eq!(Route::landing().path(), "/");
        assert_eq!(Route::files().path(), "/files");
        assert_eq!(Route::admin().path(), "/admin");
    }

    #[test]
    fn test_parse_rejects_relative_paths() {
        assert!(Route::parse("files").is_err());
        assert!(Route::parse("").is_err());
        assert_eq!(Route::parse(" /files ").unwrap().path(), "/files");
    }

    #[test]
    fn test_area_classification() {
        assert_eq!(Route::landing().area(), RouteArea::Public);
        assert_eq!(Route::parse("/login").unwrap().area(), RouteArea::Public);
        assert_eq!(Route::files().area(), RouteArea::Protected);
        assert_eq!(
            Route::parse("/files/photos/2024").unwrap().area(),
            RouteArea::Protected
        );
        assert_eq!(Route::admin().area(), RouteArea::Admin);
        assert_eq!(Route::parse("/admin/users").unwrap().area(), RouteArea::Admin);
        assert_eq!(Route::parse("/admin?tab=stats").unwrap().area(), RouteArea::Admin);
    }

    #[test]
    fn test_area_requires_segment_boundary() {
        assert_eq!(Route::parse("/filesystem").unwrap().area(), RouteArea::Public);
        assert_eq!(Route::parse("/administrator").unwrap().area(), RouteArea::Public);
    }

    #[test]
    fn test_parse_normalizes_dot_segments() {
        let route = Route::parse("/files/../admin").unwrap();
        assert_eq!(route, Route::admin());
        assert_eq!(route.area(), RouteArea::Admin);

        assert_eq!(Route::parse("//admin").unwrap().area(), RouteArea::Admin);
        assert_eq!(Route::parse("/./files/").unwrap().path(), "/files");
        assert_eq!(Route::parse("/../..").unwrap().path(), "/");
        assert_eq!(
            Route::parse("/admin/../files?next=/a/../b").unwrap().path(),
            "/files?next=/a/../b"
        );
    }

    #[test]
    fn test_serde_validates_paths() {
        let route: Route = serde_json::from_str("\"/admin\"").unwrap();
        assert_eq!(route, Route::admin());
        assert!(serde_json::from_str::<Route>("\"admin\"").is_err());
    }
}
