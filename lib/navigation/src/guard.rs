//! The route guard: a pure decision function.
//!
//! `decide` maps a session snapshot and a route's access requirement to one
//! of four decisions. It has no side effects and no memory; redirect
//! mechanics live in the [`controller`](crate::controller).

use cryptofolio_session::Session;

use crate::route::RouteAccess;

/// The guard's verdict for a requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session state is still being established; render a neutral waiting
    /// view and decide nothing.
    Pending,
    /// Render the requested view.
    Allow,
    /// The route requires authentication and no user is present; redirect
    /// to the login view, carrying the requested location as intent.
    Deny,
    /// The route forbids authenticated users and one is present; redirect
    /// to the default authenticated view.
    Redundant,
}

/// Decides whether the requested route may render for the given session.
///
/// `Pending` takes precedence over everything: no redirect is ever decided
/// on a session still in transition.
#[must_use]
pub fn decide(session: &Session, access: RouteAccess) -> GuardDecision {
    if session.loading() {
        return GuardDecision::Pending;
    }

    match access {
        RouteAccess::Protected if !session.is_authenticated() => GuardDecision::Deny,
        RouteAccess::GuestOnly if session.is_authenticated() => GuardDecision::Redundant,
        RouteAccess::Public | RouteAccess::Protected | RouteAccess::GuestOnly => {
            GuardDecision::Allow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptofolio_session::{Session, User};

    const ALL_ACCESS: [RouteAccess; 3] = [
        RouteAccess::Public,
        RouteAccess::Protected,
        RouteAccess::GuestOnly,
    ];

    fn authenticated() -> Session {
        Session::authenticated(User::new("demo@cryptofolio.com"))
    }

    #[test]
    fn pending_takes_precedence_over_everything() {
        let loading = Session::initializing();
        for access in ALL_ACCESS {
            assert_eq!(decide(&loading, access), GuardDecision::Pending, "{access:?}");
        }
    }

    #[test]
    fn unauthenticated_protected_is_denied() {
        assert_eq!(
            decide(&Session::signed_out(), RouteAccess::Protected),
            GuardDecision::Deny
        );
    }

    #[test]
    fn authenticated_guest_only_is_redundant() {
        assert_eq!(
            decide(&authenticated(), RouteAccess::GuestOnly),
            GuardDecision::Redundant
        );
    }

    #[test]
    fn all_other_combinations_allow() {
        assert_eq!(
            decide(&Session::signed_out(), RouteAccess::Public),
            GuardDecision::Allow
        );
        assert_eq!(
            decide(&Session::signed_out(), RouteAccess::GuestOnly),
            GuardDecision::Allow
        );
        assert_eq!(
            decide(&authenticated(), RouteAccess::Public),
            GuardDecision::Allow
        );
        assert_eq!(
            decide(&authenticated(), RouteAccess::Protected),
            GuardDecision::Allow
        );
    }

    #[test]
    fn decision_is_pure_and_repeatable() {
        let session = Session::signed_out();
        let first = decide(&session, RouteAccess::Protected);
        let second = decide(&session, RouteAccess::Protected);
        assert_eq!(first, second);
    }
}
