//! Email/password input shared by registration and login.
//!
//! # Invariants
//!
//! - Validation never touches the hashing machinery; malformed input is
//!   rejected before any expensive work happens.
//! - `Debug` never prints the password.

use std::fmt;

use serde::Deserialize;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;
/// Maximum password length, in bytes. Bounds the hashing input.
pub const MAX_PASSWORD_BYTES: usize = 1024;
/// Maximum email length (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Error returned when credentials fail input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The email handle is not structurally valid.
    InvalidEmail,
    /// The password has fewer than `MIN_PASSWORD_CHARS` characters.
    PasswordTooShort,
    /// The password exceeds `MAX_PASSWORD_BYTES` bytes.
    PasswordTooLong,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
            Self::PasswordTooShort => write!(
                f,
                "password must be at least {MIN_PASSWORD_CHARS} characters"
            ),
            Self::PasswordTooLong => {
                write!(f, "password must be at most {MAX_PASSWORD_BYTES} bytes")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// An email/password pair as submitted by a client.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check the email format and password policy.
    ///
    /// # Errors
    /// Returns the first rule the input violates.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ValidationError::PasswordTooShort);
        }
        if self.password.len() > MAX_PASSWORD_BYTES {
            return Err(ValidationError::PasswordTooLong);
        }
        Ok(())
    }
}

/// Structural email check: `local@domain.tld`, no whitespace or control
/// characters, one `@`, and a domain of non-empty dot-separated labels.
fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return false;
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty() && !label.starts_with('-') && !label.ends_with('-')
        })
}
