//! Error types for the session crate.
//!
//! Two distinct failure families exist:
//! - `ValidationError`: caller-side form validation; these never reach the
//!   identity provider.
//! - `ProviderError`: transport or contract failures talking to the identity
//!   provider. Expected authentication rejections (bad credentials, account
//!   conflicts) are NOT errors; they travel in-band as `AuthOutcome::Denied`.

use std::fmt;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Caller-side validation failures for the sign-in and sign-up forms.
///
/// Forms surface exactly one of these at a time; the first failing check
/// wins and blocks submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was left empty.
    MissingField { field: &'static str },
    /// The email address is not plausibly formed.
    InvalidEmail,
    /// The password is shorter than the minimum length.
    PasswordTooShort { min: usize },
    /// The password confirmation does not match the password.
    PasswordMismatch,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => {
                write!(f, "please fill in the {field} field")
            }
            Self::InvalidEmail => {
                write!(f, "please enter a valid email address")
            }
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordMismatch => {
                write!(f, "passwords do not match")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Failures reaching or speaking to the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider could not be reached.
    Unreachable { reason: String },
    /// The provider responded outside the expected wire contract.
    Protocol { reason: String },
    /// An OAuth callback arrived without a matching login initiation.
    NoPendingLogin,
    /// The OAuth callback state did not match the initiation state.
    StateMismatch,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable { reason } => {
                write!(f, "identity provider unreachable: {reason}")
            }
            Self::Protocol { reason } => {
                write!(f, "identity provider protocol error: {reason}")
            }
            Self::NoPendingLogin => {
                write!(f, "no login initiation pending for this callback")
            }
            Self::StateMismatch => {
                write!(f, "OAuth state parameter mismatch")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_missing_field_display() {
        let err = ValidationError::MissingField { field: "email" };
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn validation_error_password_too_short_display() {
        let err = ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        };
        assert!(err.to_string().contains('6'));
    }

    #[test]
    fn provider_error_unreachable_display() {
        let err = ProviderError::Unreachable {
            reason: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("unreachable"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn provider_error_state_mismatch_display() {
        let err = ProviderError::StateMismatch;
        assert!(err.to_string().contains("state"));
    }
}
