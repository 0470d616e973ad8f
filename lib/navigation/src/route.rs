//! Route access requirements and the route table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The static authentication requirement of a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteAccess {
    /// Anyone may view the route.
    #[default]
    Public,
    /// Only authenticated users may view the route.
    Protected,
    /// Only unauthenticated users may view the route (login, sign-up).
    GuestOnly,
}

/// Maps request paths to their access requirement, plus the two special
/// destinations redirects resolve to.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<String, RouteAccess>,
    login_path: String,
    default_path: String,
}

impl RouteTable {
    /// Creates an empty table with the given login view and default
    /// authenticated view.
    #[must_use]
    pub fn new(login_path: impl Into<String>, default_path: impl Into<String>) -> Self {
        let login_path = login_path.into();
        let default_path = default_path.into();
        let mut routes = HashMap::new();
        // The login view always forbids authenticated users; the default
        // authenticated view always requires one.
        routes.insert(login_path.clone(), RouteAccess::GuestOnly);
        routes.insert(default_path.clone(), RouteAccess::Protected);
        Self {
            routes,
            login_path,
            default_path,
        }
    }

    /// The route table of the cryptofolio application.
    #[must_use]
    pub fn cryptofolio() -> Self {
        Self::new("/login", "/portfolio-dashboard")
            .route("/signup", RouteAccess::GuestOnly)
            .route("/connect-portfolio", RouteAccess::Protected)
            .route("/settings", RouteAccess::Protected)
            .route("/", RouteAccess::Public)
    }

    /// Registers a route with its access requirement.
    #[must_use]
    pub fn route(mut self, path: impl Into<String>, access: RouteAccess) -> Self {
        self.routes.insert(path.into(), access);
        self
    }

    /// Returns the access requirement for a path.
    ///
    /// Unregistered paths are public; the original application only wraps
    /// the routes it explicitly protects.
    #[must_use]
    pub fn access(&self, path: &str) -> RouteAccess {
        self.routes.get(path).copied().unwrap_or_default()
    }

    /// Returns the login view path.
    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Returns the default authenticated view path.
    #[must_use]
    pub fn default_path(&self) -> &str {
        &self.default_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_registers_special_paths() {
        let table = RouteTable::new("/login", "/portfolio-dashboard");
        assert_eq!(table.access("/login"), RouteAccess::GuestOnly);
        assert_eq!(table.access("/portfolio-dashboard"), RouteAccess::Protected);
    }

    #[test]
    fn unregistered_path_is_public() {
        let table = RouteTable::new("/login", "/portfolio-dashboard");
        assert_eq!(table.access("/about"), RouteAccess::Public);
    }

    #[test]
    fn cryptofolio_table_protects_the_wizard() {
        let table = RouteTable::cryptofolio();
        assert_eq!(table.access("/connect-portfolio"), RouteAccess::Protected);
        assert_eq!(table.access("/signup"), RouteAccess::GuestOnly);
        assert_eq!(table.access("/"), RouteAccess::Public);
        assert_eq!(table.login_path(), "/login");
        assert_eq!(table.default_path(), "/portfolio-dashboard");
    }
}
