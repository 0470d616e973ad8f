//! Navigation intents.
//!
//! When an unauthenticated user is redirected to the login view, the
//! location they were trying to reach is preserved so a successful sign-in
//! lands them there instead of the fixed default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The location a user attempted to reach before being redirected to
/// authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationIntent {
    /// The originally requested path.
    path: String,
    /// When the redirect happened.
    requested_at: DateTime<Utc>,
}

impl NavigationIntent {
    /// Records an intent for the given path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requested_at: Utc::now(),
        }
    }

    /// Returns the originally requested path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns when the redirect happened.
    #[must_use]
    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }
}
