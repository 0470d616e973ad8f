//! In-memory simulated identity provider.
//!
//! Stands in for the real backend during development and tests: an account
//! table behind a configurable artificial latency, with a call counter so
//! tests can assert that caller-side validation short-circuits before any
//! provider traffic happens.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::ProviderError;
use crate::oauth::{LoginInitiation, OAuthConfig};
use crate::profile::UserProfile;
use crate::provider::{AuthOutcome, BrokerSignIn, IdentityProvider, ProviderEvent};
use crate::user::User;

/// Demo account email, pre-seeded by [`SimulatedProvider::with_demo_account`].
pub const DEMO_EMAIL: &str = "demo@cryptofolio.com";

/// Demo account password.
pub const DEMO_PASSWORD: &str = "demo123";

const INVALID_CREDENTIALS: &str = "invalid email or password";
const ACCOUNT_EXISTS: &str = "an account with this email already exists";

struct Account {
    password: String,
    user: User,
}

/// A simulated identity provider backed by an in-memory account table.
pub struct SimulatedProvider {
    accounts: Mutex<HashMap<String, Account>>,
    current: Mutex<Option<User>>,
    latency: Duration,
    oauth: Option<OAuthConfig>,
    calls: AtomicUsize,
    events: broadcast::Sender<ProviderEvent>,
}

impl SimulatedProvider {
    /// Creates an empty provider with no latency.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(8);
        Self {
            accounts: Mutex::new(HashMap::new()),
            current: Mutex::new(None),
            latency: Duration::ZERO,
            oauth: None,
            calls: AtomicUsize::new(0),
            events,
        }
    }

    /// Creates a provider pre-seeded with the demo account.
    #[must_use]
    pub fn with_demo_account() -> Self {
        let provider = Self::new();
        provider.seed_account(DEMO_EMAIL, DEMO_PASSWORD, UserProfile::new("Demo User"));
        provider
    }

    /// Sets the artificial latency applied to every network-facing call.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Configures a broker so third-party sign-in returns a redirect
    /// instead of settling locally.
    #[must_use]
    pub fn with_oauth_config(mut self, config: OAuthConfig) -> Self {
        self.oauth = Some(config);
        self
    }

    /// Adds an account directly, bypassing the sign-up path.
    pub fn seed_account(&self, email: &str, password: &str, profile: UserProfile) {
        let user = User::with_profile(email, profile);
        self.accounts.lock().expect("accounts lock").insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user,
            },
        );
    }

    /// Number of network-facing calls the provider has served.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Revokes the ambient session, as the real provider does on expiry.
    pub fn revoke_session(&self) {
        *self.current.lock().expect("current lock") = None;
        // No subscribers is fine; the event is simply dropped.
        let _ = self.events.send(ProviderEvent::SessionRevoked);
    }

    async fn simulate_network(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn set_current(&self, user: &User) {
        *self.current.lock().expect("current lock") = Some(user.clone());
    }

    fn broker_user(&self) -> User {
        User::with_profile("google-user@gmail.com", UserProfile::new("Google User"))
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for SimulatedProvider {
    async fn current_user(&self) -> Result<Option<User>, ProviderError> {
        self.simulate_network().await;
        Ok(self.current.lock().expect("current lock").clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthOutcome, ProviderError> {
        self.simulate_network().await;
        let accounts = self.accounts.lock().expect("accounts lock");
        match accounts.get(email) {
            Some(account) if account.password == password => {
                let user = account.user.clone();
                drop(accounts);
                self.set_current(&user);
                Ok(AuthOutcome::Granted(user))
            }
            _ => Ok(AuthOutcome::Denied {
                message: INVALID_CREDENTIALS.to_string(),
            }),
        }
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &UserProfile,
    ) -> Result<AuthOutcome, ProviderError> {
        self.simulate_network().await;
        let mut accounts = self.accounts.lock().expect("accounts lock");
        if accounts.contains_key(email) {
            return Ok(AuthOutcome::Denied {
                message: ACCOUNT_EXISTS.to_string(),
            });
        }

        let user = User::with_profile(email, profile.clone());
        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        drop(accounts);
        self.set_current(&user);
        Ok(AuthOutcome::Granted(user))
    }

    async fn begin_broker_sign_in(&self) -> Result<BrokerSignIn, ProviderError> {
        self.simulate_network().await;
        if let Some(config) = &self.oauth {
            return Ok(BrokerSignIn::Redirect(LoginInitiation::begin(config)?));
        }

        let user = self.broker_user();
        self.set_current(&user);
        Ok(BrokerSignIn::Settled(AuthOutcome::Granted(user)))
    }

    async fn exchange_broker_code(&self, code: &str) -> Result<AuthOutcome, ProviderError> {
        self.simulate_network().await;
        if code.is_empty() {
            return Ok(AuthOutcome::Denied {
                message: "authorization was cancelled".to_string(),
            });
        }

        let user = self.broker_user();
        self.set_current(&user);
        Ok(AuthOutcome::Granted(user))
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.simulate_network().await;
        *self.current.lock().expect("current lock") = None;
        Ok(())
    }

    fn subscribe_events(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}
