//! Caller-side form validation.
//!
//! Validation happens in the forms, before any session-manager call; an
//! invalid form never produces identity-provider traffic. Checks run in
//! field order and the first failure wins, so the user sees exactly one
//! message at a time.

use crate::error::{MIN_PASSWORD_LEN, ValidationError};

/// Input collected by the sign-in form.
#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    /// Validates the form, returning the first failing check.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` describing the first invalid field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.email, "email")?;
        require(&self.password, "password")?;
        check_email(&self.email)
    }
}

/// Input collected by the sign-up form.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    /// Validates the form, returning the first failing check.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` describing the first invalid field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "name")?;
        require(&self.email, "email")?;
        require(&self.password, "password")?;
        check_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ValidationError> {
    if is_plausible_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Loose shape check: something before the `@`, and a domain containing a
/// dot. Real address verification belongs to the identity provider.
fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_sign_up() -> SignUpForm {
        SignUpForm {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
            confirm_password: "hunter22".to_string(),
        }
    }

    #[test]
    fn valid_sign_in_passes() {
        let form = SignInForm {
            email: "demo@cryptofolio.com".to_string(),
            password: "demo123".to_string(),
        };
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn sign_in_missing_email_blocks_first() {
        let form = SignInForm {
            email: String::new(),
            password: String::new(),
        };
        // Field order decides which single message surfaces.
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingField { field: "email" })
        );
    }

    #[test]
    fn sign_in_rejects_malformed_email() {
        for email in ["plainaddress", "no@tld", "@example.com", "a b@example.com"] {
            let form = SignInForm {
                email: email.to_string(),
                password: "demo123".to_string(),
            };
            assert_eq!(form.validate(), Err(ValidationError::InvalidEmail), "{email}");
        }
    }

    #[test]
    fn valid_sign_up_passes() {
        assert_eq!(valid_sign_up().validate(), Ok(()));
    }

    #[test]
    fn sign_up_rejects_short_password() {
        let mut form = valid_sign_up();
        form.password = "short".to_string();
        form.confirm_password = "short".to_string();
        assert_eq!(
            form.validate(),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
    }

    #[test]
    fn sign_up_rejects_confirmation_mismatch() {
        let mut form = valid_sign_up();
        form.confirm_password = "different".to_string();
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
    }

    #[test]
    fn short_password_reported_before_mismatch() {
        // Both checks fail; length is reported first.
        let mut form = valid_sign_up();
        form.password = "short".to_string();
        form.confirm_password = "mismatch".to_string();
        assert_eq!(
            form.validate(),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
    }

    #[test]
    fn whitespace_only_name_is_missing() {
        let mut form = valid_sign_up();
        form.name = "   ".to_string();
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingField { field: "name" })
        );
    }
}
