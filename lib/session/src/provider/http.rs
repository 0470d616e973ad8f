//! HTTP-backed identity provider.
//!
//! Speaks the JSON wire contract of the backend auth service: every
//! authentication endpoint answers `{success, user?, error?}`. Transport
//! failures map to `ProviderError::Unreachable`; responses outside the
//! contract map to `ProviderError::Protocol`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cryptofolio_core::UserId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::ProviderError;
use crate::oauth::{LoginInitiation, OAuthConfig};
use crate::profile::UserProfile;
use crate::provider::{AuthOutcome, BrokerSignIn, IdentityProvider, ProviderEvent};
use crate::user::User;

/// Identity provider backed by the backend auth service over HTTP.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    oauth: Option<OAuthConfig>,
    // Kept alive so subscribers get an open (if quiet) channel; an HTTP
    // backend has no push path for revocations.
    events: broadcast::Sender<ProviderEvent>,
}

/// User record as the auth service serializes it.
#[derive(Debug, Serialize, Deserialize)]
struct WireUser {
    id: UserId,
    email: String,
    #[serde(default)]
    profile: Option<UserProfile>,
    created_at: DateTime<Utc>,
}

impl From<WireUser> for User {
    fn from(wire: WireUser) -> Self {
        User::with_all_fields(wire.id, wire.email, wire.profile, wire.created_at)
    }
}

/// The `{success, user?, error?}` envelope every auth endpoint answers with.
#[derive(Debug, Deserialize)]
struct WireAuthResponse {
    success: bool,
    #[serde(default)]
    user: Option<WireUser>,
    #[serde(default)]
    error: Option<String>,
}

impl WireAuthResponse {
    fn into_outcome(self) -> Result<AuthOutcome, ProviderError> {
        if self.success {
            let user = self.user.ok_or_else(|| ProviderError::Protocol {
                reason: "success response without a user record".to_string(),
            })?;
            Ok(AuthOutcome::Granted(user.into()))
        } else {
            Ok(AuthOutcome::Denied {
                message: self
                    .error
                    .unwrap_or_else(|| "authentication failed".to_string()),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireSessionResponse {
    #[serde(default)]
    user: Option<WireUser>,
}

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    profile: &'a UserProfile,
}

#[derive(Debug, Serialize)]
struct ExchangeRequest<'a> {
    code: &'a str,
}

impl HttpIdentityProvider {
    /// Creates a provider talking to the auth service at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(1);
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            oauth: None,
            events,
        }
    }

    /// Configures the OAuth broker so third-party sign-in returns a
    /// redirect built locally instead of calling the auth service.
    #[must_use]
    pub fn with_oauth_config(mut self, config: OAuthConfig) -> Self {
        self.oauth = Some(config);
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn post_auth<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<WireAuthResponse, ProviderError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Protocol {
                reason: format!("unexpected status {status} from {path}"),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Protocol {
                reason: format!("malformed response from {path}: {e}"),
            })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn current_user(&self) -> Result<Option<User>, ProviderError> {
        let response = self
            .client
            .get(self.endpoint("auth/session"))
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Protocol {
                reason: format!("unexpected status {status} from auth/session"),
            });
        }

        let session: WireSessionResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::Protocol {
                    reason: format!("malformed response from auth/session: {e}"),
                })?;
        Ok(session.user.map(User::from))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthOutcome, ProviderError> {
        let response = self
            .post_auth("auth/signin", &SignInRequest { email, password })
            .await?;
        response.into_outcome()
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &UserProfile,
    ) -> Result<AuthOutcome, ProviderError> {
        let response = self
            .post_auth(
                "auth/signup",
                &SignUpRequest {
                    email,
                    password,
                    profile,
                },
            )
            .await?;
        response.into_outcome()
    }

    async fn begin_broker_sign_in(&self) -> Result<BrokerSignIn, ProviderError> {
        if let Some(config) = &self.oauth {
            return Ok(BrokerSignIn::Redirect(LoginInitiation::begin(config)?));
        }

        let response = self
            .post_auth("auth/oauth/google", &serde_json::json!({}))
            .await?;
        Ok(BrokerSignIn::Settled(response.into_outcome()?))
    }

    async fn exchange_broker_code(&self, code: &str) -> Result<AuthOutcome, ProviderError> {
        let response = self
            .post_auth("auth/oauth/exchange", &ExchangeRequest { code })
            .await?;
        response.into_outcome()
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(self.endpoint("auth/signout"))
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Protocol {
                reason: format!("unexpected status {status} from auth/signout"),
            });
        }
        Ok(())
    }

    fn subscribe_events(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}
