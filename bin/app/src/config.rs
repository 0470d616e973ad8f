//! Centralized application configuration.
//!
//! Strongly-typed configuration loaded via the `config` crate from
//! environment variables. Everything is optional: with no environment at
//! all the app runs against the simulated identity provider with the demo
//! account seeded.

use cryptofolio_session::OAuthConfig;
use cryptofolio_session::provider::{DEMO_EMAIL, DEMO_PASSWORD};
use serde::Deserialize;

/// Application configuration composed from library configs.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Base URL of the backend auth service. When unset, the simulated
    /// identity provider is used instead.
    #[serde(default)]
    pub auth_service_url: Option<String>,

    /// OAuth broker configuration for third-party sign-in. When unset,
    /// broker sign-in settles locally (simulated) or via the auth service.
    #[serde(default)]
    pub oauth: Option<OAuthConfig>,

    /// Credentials for the demo walk-through.
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Credentials the demo flow signs in with.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_demo_email")]
    pub email: String,
    #[serde(default = "default_demo_password")]
    pub password: String,
}

fn default_demo_email() -> String {
    DEMO_EMAIL.to_string()
}

fn default_demo_password() -> String {
    DEMO_PASSWORD.to_string()
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            email: default_demo_email(),
            password: default_demo_password(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if present configuration is malformed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_simulated_provider() {
        let config = AppConfig::default();
        assert!(config.auth_service_url.is_none());
        assert!(config.oauth.is_none());
        assert_eq!(config.demo.email, DEMO_EMAIL);
        assert_eq!(config.demo.password, DEMO_PASSWORD);
    }
}
