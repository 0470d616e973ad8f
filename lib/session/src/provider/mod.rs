//! The identity-provider boundary.
//!
//! The session manager is a thin layer over an external identity provider.
//! This module defines the trait that boundary must satisfy, plus the two
//! shipped implementations: an in-memory simulated provider and an
//! HTTP-backed one.
//!
//! Expected authentication rejections (bad credentials, account conflicts)
//! are values, not errors: they come back as `AuthOutcome::Denied`. The
//! `Err` channel is reserved for transport and contract failures.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::ProviderError;
use crate::oauth::LoginInitiation;
use crate::profile::UserProfile;
use crate::user::User;

mod http;
mod simulated;

pub use http::HttpIdentityProvider;
pub use simulated::{DEMO_EMAIL, DEMO_PASSWORD, SimulatedProvider};

/// Outcome of an authentication attempt, expected failures included.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// The provider authenticated the user.
    Granted(User),
    /// The provider rejected the attempt, with a human-readable reason.
    Denied {
        /// Message suitable for direct display to the user.
        message: String,
    },
}

impl AuthOutcome {
    /// Returns true if the attempt was granted.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }
}

/// How a broker (third-party OAuth) sign-in proceeds.
#[derive(Debug, Clone, PartialEq)]
pub enum BrokerSignIn {
    /// The provider settled the sign-in locally without a redirect.
    Settled(AuthOutcome),
    /// The caller must perform a full-page redirect to the authorization URL.
    Redirect(LoginInitiation),
}

/// Provider-side session changes pushed to the application.
///
/// Session expiry is owned by the provider; the session manager reacts to
/// these events rather than tracking expiry itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The provider revoked or expired the current session.
    SessionRevoked,
}

/// The contract the external identity provider must satisfy.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the currently signed-in user, if the provider holds an
    /// ambient session. Consulted once at startup.
    async fn current_user(&self) -> Result<Option<User>, ProviderError>;

    /// Attempts to sign in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthOutcome, ProviderError>;

    /// Registers a new account with the given profile.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &UserProfile,
    ) -> Result<AuthOutcome, ProviderError>;

    /// Begins a third-party broker sign-in.
    async fn begin_broker_sign_in(&self) -> Result<BrokerSignIn, ProviderError>;

    /// Exchanges the authorization code from a broker callback for a user.
    async fn exchange_broker_code(&self, code: &str) -> Result<AuthOutcome, ProviderError>;

    /// Signs out of the provider-side session.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Subscribes to provider-side session changes.
    fn subscribe_events(&self) -> broadcast::Receiver<ProviderEvent>;
}
