//! The process-wide session state container.
//!
//! A `Session` is a snapshot of authentication state at a point in time:
//! who is signed in (if anyone), whether a state change is in flight, and
//! the message from the most recent failed operation. Snapshots are cheap
//! clones published through a `tokio::sync::watch` channel; the
//! `SessionManager` is the only component that produces new snapshots.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Authentication state of the application at a point in time.
///
/// Invariants, upheld by the transition methods:
/// - `auth_error` is never set while `loading` is true; errors surface only
///   once the operation settles.
/// - `user` flips atomically between absent and present; no intermediate
///   state is ever observable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The authenticated user, present iff authenticated.
    user: Option<User>,
    /// True while session state is being established or mutated.
    loading: bool,
    /// Message from the most recent failed operation.
    auth_error: Option<String>,
}

impl Session {
    /// The session at application start: unauthenticated and loading until
    /// the identity provider reports the current user.
    #[must_use]
    pub fn initializing() -> Self {
        Self {
            user: None,
            loading: true,
            auth_error: None,
        }
    }

    /// A settled, signed-out session.
    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            user: None,
            loading: false,
            auth_error: None,
        }
    }

    /// A settled, authenticated session.
    #[must_use]
    pub fn authenticated(user: User) -> Self {
        Self {
            user: Some(user),
            loading: false,
            auth_error: None,
        }
    }

    /// Returns the authenticated user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Returns true if a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Returns true while session state is being established or mutated.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Returns the message from the most recent failed operation, if any.
    #[must_use]
    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    /// Marks an operation as in flight. Clears any stale error.
    pub(crate) fn begin_operation(&mut self) {
        self.loading = true;
        self.auth_error = None;
    }

    /// Settles an operation that authenticated a user.
    pub(crate) fn settle_authenticated(&mut self, user: User) {
        self.user = Some(user);
        self.loading = false;
        self.auth_error = None;
    }

    /// Settles an operation that failed, surfacing its message.
    ///
    /// The previous error (already cleared by `begin_operation`) is replaced,
    /// never stacked.
    pub(crate) fn settle_failed(&mut self, message: String) {
        self.loading = false;
        self.auth_error = Some(message);
    }

    /// Settles into the signed-out state. Idempotent.
    pub(crate) fn settle_signed_out(&mut self) {
        self.user = None;
        self.loading = false;
        self.auth_error = None;
    }

    /// Settles an operation without changing who is signed in.
    pub(crate) fn settle_unchanged(&mut self) {
        self.loading = false;
    }

    /// Clears the surfaced error. Idempotent.
    pub(crate) fn clear_error(&mut self) {
        self.auth_error = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initializing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initializing_session_is_loading_and_unauthenticated() {
        let session = Session::initializing();
        assert!(session.loading());
        assert!(!session.is_authenticated());
        assert!(session.auth_error().is_none());
    }

    #[test]
    fn begin_operation_clears_stale_error() {
        let mut session = Session::signed_out();
        session.settle_failed("invalid email or password".to_string());
        assert_eq!(session.auth_error(), Some("invalid email or password"));

        session.begin_operation();
        assert!(session.loading());
        // The invariant: no error is visible while loading.
        assert!(session.auth_error().is_none());
    }

    #[test]
    fn settle_authenticated_sets_user_atomically() {
        let mut session = Session::initializing();
        session.settle_authenticated(User::new("demo@cryptofolio.com"));
        assert!(session.is_authenticated());
        assert!(!session.loading());
        assert!(session.auth_error().is_none());
    }

    #[test]
    fn settle_failed_replaces_rather_than_stacks() {
        let mut session = Session::signed_out();
        session.begin_operation();
        session.settle_failed("first".to_string());
        session.begin_operation();
        session.settle_failed("second".to_string());
        assert_eq!(session.auth_error(), Some("second"));
    }

    #[test]
    fn settle_signed_out_is_idempotent() {
        let mut session = Session::authenticated(User::new("demo@cryptofolio.com"));
        session.settle_signed_out();
        let first = session.clone();
        session.settle_signed_out();
        assert_eq!(session, first);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn clear_error_is_idempotent() {
        let mut session = Session::signed_out();
        session.settle_failed("oops".to_string());
        session.clear_error();
        let once = session.clone();
        session.clear_error();
        assert_eq!(session, once);
        assert!(session.auth_error().is_none());
    }
}
