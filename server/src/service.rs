//! Registration and login.
//!
//! Life of a login:
//! 1. Validate the email/password shape (no crypto yet)
//! 2. Look up the stored record by handle
//! 3. Verify the password on a blocking worker; an unknown handle is
//!    verified against a decoy hash so both failure causes cost the same
//! 4. Collapse "unknown handle" and "wrong password" into one rejection
//! 5. Sign a token for the authenticated identity
//!
//! # Invariants
//! - All state is fixed at construction; handlers share the service via `Arc`.
//! - Argon2 never runs on an async worker thread.

use std::sync::Arc;
use std::time::SystemTime;

use serde_json::Map;

use crate::auth::{KeyPublisher, PasswordHasher, PublishedKeySet, SigningKeyPair, TokenIssuer};
use crate::config::ServerConfig;
use crate::error::{BootError, RequestError};
use crate::store::{CredentialStore, InMemoryCredentialStore, StoreError};
use crate::types::{CredentialRecord, Credentials, Identity};

/// Password compared against when a handle is unknown.
const DECOY_PASSWORD: &str = "decoy-password-never-matches";

/// Result of checking a login attempt.
///
/// There is exactly one rejection variant: callers cannot tell an unknown
/// handle from a wrong password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(Identity),
    Rejected,
}

/// Everything a request handler needs, built once at startup.
pub struct AuthService {
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    publisher: KeyPublisher,
    store: Arc<dyn CredentialStore>,
    decoy_hash: Arc<str>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("kid", &self.issuer.kid())
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Assemble the service around an existing key pair and store.
    ///
    /// Computes the decoy hash, so this blocks for one hashing round.
    ///
    /// # Errors
    /// Returns `BootError::Hashing` if the decoy hash cannot be computed.
    pub fn new(
        hasher: PasswordHasher,
        key_pair: Arc<SigningKeyPair>,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, BootError> {
        let decoy_hash: Arc<str> = hasher.hash(DECOY_PASSWORD)?.into();
        let publisher = KeyPublisher::new(&key_pair);
        let issuer = TokenIssuer::new(key_pair);

        Ok(Self {
            hasher,
            issuer,
            publisher,
            store,
            decoy_hash,
        })
    }

    /// Build the service from configuration: generate the signing key and
    /// set up an in-memory credential store.
    ///
    /// Blocks for key generation. Call once, before the listener is bound.
    ///
    /// # Errors
    /// Returns `BootError` if the key or hasher cannot be created.
    pub fn bootstrap(config: &ServerConfig) -> Result<Self, BootError> {
        let hasher = PasswordHasher::new(config.hashing)?;

        tracing::info!("generating {}-bit RSA signing key", config.rsa_key_bits);
        let key_pair = Arc::new(SigningKeyPair::generate(config.rsa_key_bits)?);
        tracing::info!("signing key ready: kid={}", key_pair.kid());

        Self::new(hasher, key_pair, Arc::new(InMemoryCredentialStore::new()))
    }

    /// Key identifier of the process signing key.
    #[must_use]
    pub fn kid(&self) -> &str {
        self.issuer.kid()
    }

    /// The published verification keys.
    #[must_use]
    pub const fn key_set(&self) -> &PublishedKeySet {
        self.publisher.current_key_set()
    }

    /// Report whether the credential store is usable.
    ///
    /// # Errors
    /// Returns the store's error when it is not.
    pub fn health(&self) -> Result<(), StoreError> {
        self.store.health()
    }

    /// Register a new identity.
    ///
    /// # Errors
    /// - `RequestError::Validation` for a malformed email or weak password,
    ///   before any hashing happens
    /// - `RequestError::Conflict` if the handle is taken
    /// - `RequestError::Hashing` / `RequestError::Store` for internal failures
    pub async fn register(&self, credentials: Credentials) -> Result<Identity, RequestError> {
        credentials.validate()?;
        let Credentials { email, password } = credentials;

        let hasher = self.hasher.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| RequestError::Hashing(e.to_string()))??;

        let identity = Identity::new(email);
        self.store.insert(CredentialRecord {
            identity: identity.clone(),
            password_hash,
        })?;

        tracing::info!("registered identity {}", identity.id);
        Ok(identity)
    }

    /// Check a login attempt without issuing anything.
    ///
    /// # Errors
    /// Returns `RequestError::Store` or `RequestError::Hashing` for internal
    /// failures. Bad credentials are `Ok(LoginOutcome::Rejected)`.
    pub async fn authenticate(
        &self,
        credentials: Credentials,
    ) -> Result<LoginOutcome, RequestError> {
        let Credentials { email, password } = credentials;

        let (identity, password_hash) = match self.store.find_by_handle(&email)? {
            Some(record) => (Some(record.identity), record.password_hash),
            None => (None, self.decoy_hash.to_string()),
        };

        let hasher = self.hasher.clone();
        let matched = tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await
            .map_err(|e| RequestError::Hashing(e.to_string()))??;

        Ok(match (identity, matched) {
            (Some(identity), true) => LoginOutcome::Authenticated(identity),
            _ => LoginOutcome::Rejected,
        })
    }

    /// Authenticate and issue a bearer token.
    ///
    /// # Errors
    /// - `RequestError::Validation` for malformed input
    /// - `RequestError::Unauthorized` for an unknown handle or wrong password
    /// - `RequestError::Signing` if the token cannot be signed
    pub async fn login(&self, credentials: Credentials) -> Result<String, RequestError> {
        credentials.validate()?;

        match self.authenticate(credentials).await? {
            LoginOutcome::Authenticated(identity) => {
                let token = self
                    .issuer
                    .issue(&identity, Map::new(), SystemTime::now())
                    .inspect_err(|e| {
                        tracing::error!("signing key integrity fault: {e}");
                    })?;
                tracing::debug!("issued token for identity {}", identity.id);
                Ok(token)
            }
            LoginOutcome::Rejected => Err(RequestError::Unauthorized),
        }
    }
}
