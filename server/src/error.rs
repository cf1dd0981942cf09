//! Error categories for the auth server.
//!
//! `BootError` aborts startup; the process never begins serving.
//! `RequestError` is returned per request; the process keeps running.

use crate::auth::{KeyError, PasswordError, TokenError};
use crate::config::ConfigError;
use crate::store::StoreError;
use crate::types::ValidationError;

/// Fatal failure while constructing the server.
#[derive(Debug)]
pub enum BootError {
    /// Configuration could not be loaded.
    Config(ConfigError),
    /// The signing key could not be created.
    Key(KeyError),
    /// The password hasher could not be set up.
    Hashing(PasswordError),
    /// The listener could not be bound or the server loop failed.
    Io(std::io::Error),
}

impl std::fmt::Display for BootError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Key(e) => write!(f, "signing key error: {e}"),
            Self::Hashing(e) => write!(f, "password hasher error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for BootError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Key(e) => Some(e),
            Self::Hashing(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<ConfigError> for BootError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<KeyError> for BootError {
    fn from(e: KeyError) -> Self {
        Self::Key(e)
    }
}

impl From<PasswordError> for BootError {
    fn from(e: PasswordError) -> Self {
        Self::Hashing(e)
    }
}

impl From<std::io::Error> for BootError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Failure while handling a single request.
#[derive(Debug)]
pub enum RequestError {
    /// Malformed input, rejected before any crypto work.
    Validation(String),
    /// Unknown handle or wrong password. Deliberately carries no detail.
    Unauthorized,
    /// The handle is already registered.
    Conflict,
    /// Password hashing or verification could not complete.
    Hashing(String),
    /// Token signing failed.
    Signing(String),
    /// The credential store failed.
    Store(String),
}

impl RequestError {
    /// Message safe to send to the caller.
    ///
    /// Internal variants share opaque messages; their detail only goes to logs.
    #[must_use]
    pub fn public_message(&self) -> &str {
        match self {
            Self::Validation(message) => message,
            Self::Unauthorized => "Invalid email or password",
            Self::Conflict => "Email already registered",
            Self::Hashing(_) => "Failed to process credentials",
            Self::Signing(_) => "Failed to create token",
            Self::Store(_) => "Internal server error",
        }
    }

    /// Whether this is a server-side fault rather than a client mistake.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Hashing(_) | Self::Signing(_) | Self::Store(_))
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "validation failed: {message}"),
            Self::Unauthorized => write!(f, "invalid credentials"),
            Self::Conflict => write!(f, "handle already registered"),
            Self::Hashing(detail) => write!(f, "hashing failed: {detail}"),
            Self::Signing(detail) => write!(f, "signing failed: {detail}"),
            Self::Store(detail) => write!(f, "store failed: {detail}"),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<ValidationError> for RequestError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<PasswordError> for RequestError {
    fn from(e: PasswordError) -> Self {
        Self::Hashing(e.to_string())
    }
}

impl From<TokenError> for RequestError {
    fn from(e: TokenError) -> Self {
        Self::Signing(e.to_string())
    }
}

impl From<StoreError> for RequestError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(_) => Self::Conflict,
            StoreError::Unavailable(reason) => Self::Store(reason),
        }
    }
}
