//! The session manager: single authority over authentication state.
//!
//! All session mutations funnel through `SessionManager`. It publishes
//! `Session` snapshots through a `tokio::sync::watch` channel; consumers
//! subscribe and read, never write.
//!
//! Overlapping operations are serialized through an async mutex: a second
//! call queues behind the first instead of interleaving state updates.
//! Callers should still disable their trigger controls while
//! `Session::loading` is true to avoid double submission.
//!
//! Expected authentication failures never escape as errors; they settle the
//! session with an `auth_error` message and come back in-band as
//! `AuthOutcome::Denied`.

use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex, broadcast, watch};
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::oauth::{CallbackData, LoginInitiation};
use crate::profile::UserProfile;
use crate::provider::{AuthOutcome, BrokerSignIn, IdentityProvider, ProviderEvent};
use crate::session::Session;

const UNREACHABLE_MESSAGE: &str = "unable to reach the sign-in service, please try again";
const UNVERIFIED_MESSAGE: &str = "sign-in could not be verified, please try again";
const GENERIC_MESSAGE: &str = "something went wrong, please try again";

/// How a third-party sign-in proceeded from the caller's point of view.
///
/// The contract mirrors the browser reality: the call either settles the
/// session locally, or hands back a redirect and the page navigates away.
#[derive(Debug, Clone, PartialEq)]
pub enum OAuthSignIn {
    /// The sign-in settled without leaving the application.
    Settled(AuthOutcome),
    /// The caller must redirect the user to the authorization URL; the
    /// session settles later through [`SessionManager::complete_oauth`].
    Redirect(LoginInitiation),
}

/// Single process-wide authority over authentication state.
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    sessions: watch::Sender<Session>,
    /// Serializes network-facing operations; see module docs.
    op_gate: Mutex<()>,
    /// The login initiation awaiting its OAuth callback, if any.
    pending_login: StdMutex<Option<LoginInitiation>>,
}

impl SessionManager {
    /// Creates a manager over the given identity provider.
    ///
    /// The session starts as "unauthenticated, loading" until
    /// [`initialize`](Self::initialize) consults the provider.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (sessions, _) = watch::channel(Session::initializing());
        Self {
            provider,
            sessions,
            op_gate: Mutex::new(()),
            pending_login: StdMutex::new(None),
        }
    }

    /// Subscribes to session snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.sessions.subscribe()
    }

    /// Returns the current session snapshot.
    #[must_use]
    pub fn current(&self) -> Session {
        self.sessions.borrow().clone()
    }

    /// Populates the session from the provider's ambient session.
    ///
    /// Call once at application start. A provider failure here settles the
    /// session as signed out without surfacing an error; the user simply
    /// starts unauthenticated.
    pub async fn initialize(&self) {
        let _gate = self.op_gate.lock().await;
        self.sessions.send_modify(Session::begin_operation);

        match self.provider.current_user().await {
            Ok(Some(user)) => {
                info!(user = %user.id(), "restored ambient session");
                self.sessions
                    .send_modify(|s| s.settle_authenticated(user.clone()));
            }
            Ok(None) => {
                self.sessions.send_modify(Session::settle_signed_out);
            }
            Err(err) => {
                warn!(error = %err, "could not restore ambient session");
                self.sessions.send_modify(Session::settle_signed_out);
            }
        }
    }

    /// Spawns a task that signs the session out when the provider revokes
    /// it (expiry is delegated to the provider).
    pub fn spawn_revocation_watcher(&self) -> tokio::task::JoinHandle<()> {
        let sessions = self.sessions.clone();
        let mut events = self.provider.subscribe_events();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(ProviderEvent::SessionRevoked) => {
                        info!("provider revoked the session");
                        sessions.send_modify(Session::settle_signed_out);
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Attempts to sign in with email and password.
    ///
    /// Validation of the credentials' form is the caller's job; this
    /// operation only reports what the provider decided.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthOutcome {
        let _gate = self.op_gate.lock().await;
        self.sessions.send_modify(Session::begin_operation);
        let result = self.provider.sign_in(email, password).await;
        self.settle(result)
    }

    /// Registers a new account and signs it in.
    pub async fn sign_up(&self, email: &str, password: &str, profile: &UserProfile) -> AuthOutcome {
        let _gate = self.op_gate.lock().await;
        self.sessions.send_modify(Session::begin_operation);
        let result = self.provider.sign_up(email, password, profile).await;
        self.settle(result)
    }

    /// Starts a third-party ("Sign in with Google") sign-in.
    ///
    /// When a redirect comes back the session settles unchanged and the
    /// pending initiation is retained for [`complete_oauth`](Self::complete_oauth).
    pub async fn sign_in_with_google(&self) -> OAuthSignIn {
        let _gate = self.op_gate.lock().await;
        self.sessions.send_modify(Session::begin_operation);

        match self.provider.begin_broker_sign_in().await {
            Ok(BrokerSignIn::Settled(outcome)) => OAuthSignIn::Settled(self.settle(Ok(outcome))),
            Ok(BrokerSignIn::Redirect(initiation)) => {
                *self.pending_login.lock().expect("pending login lock") =
                    Some(initiation.clone());
                // The page is about to navigate away; nothing settled yet.
                self.sessions.send_modify(Session::settle_unchanged);
                OAuthSignIn::Redirect(initiation)
            }
            Err(err) => OAuthSignIn::Settled(self.settle(Err(err))),
        }
    }

    /// Completes a third-party sign-in from the broker's callback.
    ///
    /// The callback state must match the pending initiation; a mismatch or
    /// a callback with nothing pending is denied, not exchanged.
    pub async fn complete_oauth(&self, callback: &CallbackData) -> AuthOutcome {
        let _gate = self.op_gate.lock().await;
        self.sessions.send_modify(Session::begin_operation);

        let pending = self.pending_login.lock().expect("pending login lock").take();
        let Some(initiation) = pending else {
            return self.settle(Err(ProviderError::NoPendingLogin));
        };
        if initiation.state != callback.state {
            warn!("OAuth callback state mismatch");
            return self.settle(Err(ProviderError::StateMismatch));
        }

        let result = self.provider.exchange_broker_code(&callback.code).await;
        self.settle(result)
    }

    /// Signs out. Idempotent: signing out while signed out is a no-op.
    ///
    /// Provider-side failures are logged, never surfaced; the local session
    /// always ends up signed out.
    pub async fn sign_out(&self) {
        let _gate = self.op_gate.lock().await;
        self.sessions.send_modify(Session::begin_operation);
        if let Err(err) = self.provider.sign_out().await {
            warn!(error = %err, "provider sign-out failed");
        }
        self.sessions.send_modify(Session::settle_signed_out);
    }

    /// Clears the surfaced error. Pure state mutation, idempotent.
    pub fn clear_error(&self) {
        self.sessions.send_modify(Session::clear_error);
    }

    /// Settles the in-flight operation, normalizing provider failures into
    /// user-facing denial messages.
    fn settle(&self, result: Result<AuthOutcome, ProviderError>) -> AuthOutcome {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "identity provider operation failed");
                let message = match err {
                    ProviderError::Unreachable { .. } => UNREACHABLE_MESSAGE,
                    ProviderError::NoPendingLogin | ProviderError::StateMismatch => {
                        UNVERIFIED_MESSAGE
                    }
                    ProviderError::Protocol { .. } => GENERIC_MESSAGE,
                };
                AuthOutcome::Denied {
                    message: message.to_string(),
                }
            }
        };

        match &outcome {
            AuthOutcome::Granted(user) => {
                info!(user = %user.id(), "session authenticated");
                self.sessions
                    .send_modify(|s| s.settle_authenticated(user.clone()));
            }
            AuthOutcome::Denied { message } => {
                self.sessions
                    .send_modify(|s| s.settle_failed(message.clone()));
            }
        }
        outcome
    }
}
