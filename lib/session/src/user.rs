//! User domain type.
//!
//! The User represents an authenticated user of the application, as reported
//! by the external identity provider. The internal `id` is stable across
//! sign-ins and is used for all application-level lookups.

use chrono::{DateTime, Utc};
use cryptofolio_core::UserId;
use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

/// An authenticated user.
///
/// Users exist only while a session is authenticated; the session holds
/// `Option<User>` and this type is absent before sign-in and after sign-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Internal stable user ID.
    id: UserId,
    /// The user's email address.
    email: String,
    /// Profile supplied at sign-up, if any.
    profile: Option<UserProfile>,
    /// When the user record was created by the provider.
    created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a generated ID.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            email: email.into(),
            profile: None,
            created_at: Utc::now(),
        }
    }

    /// Creates a user with a profile, as done at sign-up.
    #[must_use]
    pub fn with_profile(email: impl Into<String>, profile: UserProfile) -> Self {
        let mut user = Self::new(email);
        user.profile = Some(profile);
        user
    }

    /// Creates a user with all fields specified.
    ///
    /// Use this when reconstituting a user from a provider response.
    #[must_use]
    pub fn with_all_fields(
        id: UserId,
        email: String,
        profile: Option<UserProfile>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            profile,
            created_at,
        }
    }

    /// Returns the user's stable ID.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the user's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the user's profile, if one was supplied at sign-up.
    #[must_use]
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Returns when the user record was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
