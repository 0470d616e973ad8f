//! Sign-up profile types.
//!
//! The profile is collected by the sign-up form and handed to the identity
//! provider along with the credentials. Notification preferences carry the
//! application defaults when not explicitly set.

use serde::{Deserialize, Serialize};

/// Profile supplied when registering a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user's display name.
    pub name: String,
    /// Optional wallet address to pre-fill the portfolio connection wizard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    /// Preferred fiat display currency (ISO 4217 code).
    #[serde(default = "default_currency")]
    pub preferred_currency: String,
    /// Notification preferences.
    #[serde(default)]
    pub notifications: NotificationPreferences,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl UserProfile {
    /// Creates a profile with the given name and defaults for everything else.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wallet_address: None,
            preferred_currency: default_currency(),
            notifications: NotificationPreferences::default(),
        }
    }

    /// Sets the wallet address.
    #[must_use]
    pub fn with_wallet_address(mut self, address: impl Into<String>) -> Self {
        self.wallet_address = Some(address.into());
        self
    }

    /// Sets the preferred display currency.
    #[must_use]
    pub fn with_preferred_currency(mut self, currency: impl Into<String>) -> Self {
        self.preferred_currency = currency.into();
        self
    }
}

/// Per-channel notification preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    /// Email notifications.
    #[serde(default = "default_true")]
    pub email: bool,
    /// Push notifications.
    #[serde(default)]
    pub push: bool,
    /// Price alert notifications.
    #[serde(default = "default_true")]
    pub price_alerts: bool,
    /// Portfolio update notifications.
    #[serde(default = "default_true")]
    pub portfolio_updates: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            push: false,
            price_alerts: true,
            portfolio_updates: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_defaults() {
        let prefs = NotificationPreferences::default();
        assert!(prefs.email);
        assert!(!prefs.push);
        assert!(prefs.price_alerts);
        assert!(prefs.portfolio_updates);
    }

    #[test]
    fn new_profile_has_defaults() {
        let profile = UserProfile::new("Alice");
        assert_eq!(profile.name, "Alice");
        assert!(profile.wallet_address.is_none());
        assert_eq!(profile.preferred_currency, "USD");
        assert_eq!(profile.notifications, NotificationPreferences::default());
    }

    #[test]
    fn profile_builders_set_fields() {
        let profile = UserProfile::new("Alice")
            .with_wallet_address("0xabc123")
            .with_preferred_currency("EUR");
        assert_eq!(profile.wallet_address.as_deref(), Some("0xabc123"));
        assert_eq!(profile.preferred_currency, "EUR");
    }

    #[test]
    fn profile_deserializes_with_defaults() {
        let json = r#"{ "name": "Alice" }"#;
        let profile: UserProfile = serde_json::from_str(json).expect("deserialize");
        assert_eq!(profile.preferred_currency, "USD");
        assert!(profile.notifications.email);
        assert!(!profile.notifications.push);
    }
}
