//! The navigation controller.
//!
//! Interprets guard decisions against an actual location: it moves between
//! views, records a [`NavigationIntent`] when a protected request is denied,
//! parks requests that arrive while the session is loading, and resolves the
//! intent after a successful sign-in.

use tokio::sync::watch;
use tracing::debug;

use cryptofolio_session::Session;

use crate::guard::{GuardDecision, decide};
use crate::intent::NavigationIntent;
use crate::route::RouteTable;

/// What a navigation request resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The requested view rendered.
    Rendered,
    /// The session is still loading; the request is parked and will be
    /// re-evaluated on the next [`refresh`](NavigationController::refresh).
    Waiting,
    /// Redirected to the login view; the request was recorded as intent.
    RedirectedToLogin,
    /// Redirected to the default authenticated view.
    RedirectedToDefault,
}

/// Applies guard decisions to the application's current location.
///
/// The controller holds a read-only view of the session (a `watch`
/// receiver); it never mutates session state.
#[derive(Debug)]
pub struct NavigationController {
    table: RouteTable,
    sessions: watch::Receiver<Session>,
    location: String,
    /// Request parked while the session was loading.
    parked: Option<String>,
    intent: Option<NavigationIntent>,
}

impl NavigationController {
    /// Creates a controller starting at the root path.
    #[must_use]
    pub fn new(table: RouteTable, sessions: watch::Receiver<Session>) -> Self {
        Self {
            table,
            sessions,
            location: "/".to_string(),
            parked: None,
            intent: None,
        }
    }

    /// Returns the current location.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the recorded intent, if a login redirect is pending.
    #[must_use]
    pub fn intent(&self) -> Option<&NavigationIntent> {
        self.intent.as_ref()
    }

    /// Requests navigation to `path`, applying the guard's decision.
    pub fn navigate(&mut self, path: &str) -> NavigationOutcome {
        let session = self.sessions.borrow().clone();
        match decide(&session, self.table.access(path)) {
            GuardDecision::Pending => {
                debug!(path, "session loading, parking navigation request");
                self.parked = Some(path.to_string());
                NavigationOutcome::Waiting
            }
            GuardDecision::Allow => {
                self.parked = None;
                self.location = path.to_string();
                NavigationOutcome::Rendered
            }
            GuardDecision::Deny => {
                debug!(path, "unauthenticated, redirecting to login");
                self.parked = None;
                self.intent = Some(NavigationIntent::new(path));
                self.location = self.table.login_path().to_string();
                NavigationOutcome::RedirectedToLogin
            }
            GuardDecision::Redundant => {
                debug!(path, "already authenticated, redirecting to default view");
                self.parked = None;
                self.location = self.table.default_path().to_string();
                NavigationOutcome::RedirectedToDefault
            }
        }
    }

    /// Re-evaluates the parked request, or the current location, against
    /// the latest session snapshot.
    ///
    /// Call whenever the session changes: it resolves requests parked
    /// during loading, evicts a protected view after sign-out, and moves
    /// an authenticated user off a guest-only view.
    pub fn refresh(&mut self) -> NavigationOutcome {
        let target = self
            .parked
            .take()
            .unwrap_or_else(|| self.location.clone());
        self.navigate(&target)
    }

    /// Navigates to where a freshly signed-in user should land: the
    /// recorded intent if one exists, the default view otherwise.
    pub fn continue_after_sign_in(&mut self) -> NavigationOutcome {
        let destination = self
            .intent
            .take()
            .map_or_else(|| self.table.default_path().to_string(), |i| i.path().to_string());
        self.navigate(&destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteAccess;
    use cryptofolio_session::{SessionManager, SimulatedProvider, User};
    use cryptofolio_session::provider::{DEMO_EMAIL, DEMO_PASSWORD};
    use std::sync::Arc;

    fn controller_with(session: Session) -> (watch::Sender<Session>, NavigationController) {
        let (tx, rx) = watch::channel(session);
        (tx, NavigationController::new(RouteTable::cryptofolio(), rx))
    }

    #[test]
    fn denied_request_records_intent_and_lands_on_login() {
        let (_tx, mut controller) = controller_with(Session::signed_out());

        let outcome = controller.navigate("/portfolio-dashboard");
        assert_eq!(outcome, NavigationOutcome::RedirectedToLogin);
        assert_eq!(controller.location(), "/login");
        assert_eq!(
            controller.intent().map(NavigationIntent::path),
            Some("/portfolio-dashboard")
        );
    }

    #[test]
    fn sign_in_resolves_to_intent_not_default() {
        let (tx, mut controller) = controller_with(Session::signed_out());
        controller.navigate("/connect-portfolio");

        tx.send(Session::authenticated(User::new(DEMO_EMAIL)))
            .expect("receiver alive");
        let outcome = controller.continue_after_sign_in();
        assert_eq!(outcome, NavigationOutcome::Rendered);
        assert_eq!(controller.location(), "/connect-portfolio");
        assert!(controller.intent().is_none());
    }

    #[test]
    fn sign_in_without_intent_lands_on_default() {
        let (tx, mut controller) = controller_with(Session::signed_out());
        controller.navigate("/login");

        tx.send(Session::authenticated(User::new(DEMO_EMAIL)))
            .expect("receiver alive");
        let outcome = controller.continue_after_sign_in();
        assert_eq!(outcome, NavigationOutcome::Rendered);
        assert_eq!(controller.location(), "/portfolio-dashboard");
    }

    #[test]
    fn authenticated_user_never_sees_the_login_view() {
        let (_tx, mut controller) =
            controller_with(Session::authenticated(User::new(DEMO_EMAIL)));

        let outcome = controller.navigate("/login");
        assert_eq!(outcome, NavigationOutcome::RedirectedToDefault);
        assert_eq!(controller.location(), "/portfolio-dashboard");
        assert!(controller.intent().is_none());
    }

    #[test]
    fn loading_session_parks_the_request() {
        let (tx, mut controller) = controller_with(Session::initializing());

        let outcome = controller.navigate("/portfolio-dashboard");
        assert_eq!(outcome, NavigationOutcome::Waiting);
        // No redirect fired mid-transition.
        assert_eq!(controller.location(), "/");
        assert!(controller.intent().is_none());

        tx.send(Session::signed_out()).expect("receiver alive");
        let outcome = controller.refresh();
        assert_eq!(outcome, NavigationOutcome::RedirectedToLogin);
        assert_eq!(
            controller.intent().map(NavigationIntent::path),
            Some("/portfolio-dashboard")
        );
    }

    #[test]
    fn parked_request_allows_once_session_restores() {
        let (tx, mut controller) = controller_with(Session::initializing());
        controller.navigate("/portfolio-dashboard");

        tx.send(Session::authenticated(User::new(DEMO_EMAIL)))
            .expect("receiver alive");
        assert_eq!(controller.refresh(), NavigationOutcome::Rendered);
        assert_eq!(controller.location(), "/portfolio-dashboard");
    }

    #[test]
    fn sign_out_evicts_protected_view_on_refresh() {
        let (tx, mut controller) =
            controller_with(Session::authenticated(User::new(DEMO_EMAIL)));
        controller.navigate("/settings");
        assert_eq!(controller.location(), "/settings");

        tx.send(Session::signed_out()).expect("receiver alive");
        let outcome = controller.refresh();
        assert_eq!(outcome, NavigationOutcome::RedirectedToLogin);
        assert_eq!(controller.location(), "/login");
    }

    #[test]
    fn public_routes_render_for_everyone() {
        let (_tx, mut controller) = controller_with(Session::signed_out());
        assert_eq!(controller.navigate("/"), NavigationOutcome::Rendered);

        let (_tx, mut controller) =
            controller_with(Session::authenticated(User::new(DEMO_EMAIL)));
        assert_eq!(controller.navigate("/"), NavigationOutcome::Rendered);
    }

    #[test]
    fn custom_tables_guard_their_own_routes() {
        let table = RouteTable::new("/signin", "/home").route("/admin", RouteAccess::Protected);
        let (_tx, rx) = watch::channel(Session::signed_out());
        let mut controller = NavigationController::new(table, rx);

        assert_eq!(
            controller.navigate("/admin"),
            NavigationOutcome::RedirectedToLogin
        );
        assert_eq!(controller.location(), "/signin");
    }

    /// The full demo scenario: an unauthenticated request for the
    /// dashboard bounces through login and resolves after sign-in.
    #[tokio::test]
    async fn demo_flow_lands_on_originally_requested_view() {
        let provider = Arc::new(SimulatedProvider::with_demo_account());
        let manager = SessionManager::new(provider);
        let mut controller =
            NavigationController::new(RouteTable::cryptofolio(), manager.subscribe());

        // App boots; the session is still loading, so no decision yet.
        assert_eq!(
            controller.navigate("/portfolio-dashboard"),
            NavigationOutcome::Waiting
        );

        manager.initialize().await;
        assert_eq!(controller.refresh(), NavigationOutcome::RedirectedToLogin);
        assert_eq!(controller.location(), "/login");

        let outcome = manager.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await;
        assert!(outcome.is_granted());

        assert_eq!(
            controller.continue_after_sign_in(),
            NavigationOutcome::Rendered
        );
        assert_eq!(controller.location(), "/portfolio-dashboard");
    }
}
