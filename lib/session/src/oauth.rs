//! OAuth broker configuration and login initiation.
//!
//! Third-party sign-in ("Sign in with Google") is a full-page redirect to an
//! external authorization endpoint. This module builds the redirect: the
//! authorization URL carries a random CSRF state, a nonce, and an S256 PKCE
//! challenge derived from a verifier that the caller must hold on to for the
//! callback leg.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

use crate::error::ProviderError;

/// Configuration for the third-party OAuth broker.
///
/// Fields with defaults can be omitted when loading from environment
/// variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// The broker's authorization endpoint
    /// (e.g., "https://accounts.google.com/o/oauth2/v2/auth").
    authorize_endpoint: String,
    /// The OAuth2 client ID registered with the broker.
    client_id: String,
    /// The redirect URI for the OAuth2 callback.
    redirect_uri: String,
    /// OAuth2 scopes to request as a comma-separated string.
    /// Default: "openid,email,profile"
    #[serde(default = "default_scopes")]
    scopes: String,
}

fn default_scopes() -> String {
    "openid,email,profile".to_string()
}

impl OAuthConfig {
    /// Creates a new OAuth configuration with default scopes.
    #[must_use]
    pub fn new(authorize_endpoint: String, client_id: String, redirect_uri: String) -> Self {
        Self {
            authorize_endpoint,
            client_id,
            redirect_uri,
            scopes: default_scopes(),
        }
    }

    /// Creates a configuration builder for more customization.
    #[must_use]
    pub fn builder(
        authorize_endpoint: String,
        client_id: String,
        redirect_uri: String,
    ) -> OAuthConfigBuilder {
        OAuthConfigBuilder::new(authorize_endpoint, client_id, redirect_uri)
    }

    /// Returns the broker's authorization endpoint.
    #[must_use]
    pub fn authorize_endpoint(&self) -> &str {
        &self.authorize_endpoint
    }

    /// Returns the OAuth2 client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth2 redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Returns the OAuth2 scopes to request, parsed from comma-separated string.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes.split(',').map(str::trim).collect()
    }
}

/// Builder for `OAuthConfig`.
#[derive(Debug)]
pub struct OAuthConfigBuilder {
    authorize_endpoint: String,
    client_id: String,
    redirect_uri: String,
    scopes: Vec<String>,
}

impl OAuthConfigBuilder {
    /// Creates a new builder with required fields.
    #[must_use]
    pub fn new(authorize_endpoint: String, client_id: String, redirect_uri: String) -> Self {
        Self {
            authorize_endpoint,
            client_id,
            redirect_uri,
            scopes: vec![
                "openid".to_string(),
                "email".to_string(),
                "profile".to_string(),
            ],
        }
    }

    /// Sets the OAuth2 scopes to request.
    #[must_use]
    pub fn scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Adds a scope to the list of scopes to request.
    #[must_use]
    pub fn add_scope(mut self, scope: String) -> Self {
        if !self.scopes.contains(&scope) {
            self.scopes.push(scope);
        }
        self
    }

    /// Builds the `OAuthConfig`.
    #[must_use]
    pub fn build(self) -> OAuthConfig {
        OAuthConfig {
            authorize_endpoint: self.authorize_endpoint,
            client_id: self.client_id,
            redirect_uri: self.redirect_uri,
            scopes: self.scopes.join(","),
        }
    }
}

/// Login initiation data for redirecting to the OAuth broker.
///
/// The state, verifier, and nonce must be retained across the redirect so
/// the callback can be validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInitiation {
    /// The URL to redirect the user to for authentication.
    pub authorization_url: String,
    /// State parameter for CSRF protection.
    pub state: String,
    /// PKCE code verifier matching the challenge in the URL.
    pub pkce_verifier: String,
    /// Nonce for ID token validation.
    pub nonce: String,
}

impl LoginInitiation {
    /// Begins a broker sign-in by constructing the authorization URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured authorization endpoint is not a
    /// valid URL.
    pub fn begin(config: &OAuthConfig) -> Result<Self, ProviderError> {
        let state = random_token(16);
        let nonce = random_token(16);
        let pkce_verifier = random_token(32);
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(pkce_verifier.as_bytes()));

        let mut url =
            Url::parse(config.authorize_endpoint()).map_err(|e| ProviderError::Protocol {
                reason: format!("invalid authorize endpoint: {e}"),
            })?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", config.client_id())
            .append_pair("redirect_uri", config.redirect_uri())
            .append_pair("scope", &config.scopes().join(" "))
            .append_pair("state", &state)
            .append_pair("nonce", &nonce)
            .append_pair("code_challenge", &challenge)
            .append_pair("code_challenge_method", "S256");

        Ok(Self {
            authorization_url: url.into(),
            state,
            pkce_verifier,
            nonce,
        })
    }
}

/// Data arriving on the OAuth callback after the broker redirects back.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackData {
    /// The authorization code from the broker.
    pub code: String,
    /// The state parameter (must match the one from login initiation).
    pub state: String,
}

/// Generates a URL-safe random token from `len` bytes of system randomness.
fn random_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    getrandom::fill(&mut bytes).expect("read system randomness");
    URL_SAFE_NO_PAD.encode(bytes)
}
