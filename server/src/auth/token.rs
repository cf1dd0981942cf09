//! Bearer token issuance.
//!
//! Builds RS256 JWTs for authenticated identities and signs them with the
//! process signing key.
//!
//! # Pre-conditions
//! - The signing key pair was generated successfully at startup.
//!
//! # Post-conditions
//! - Every token header carries `alg: RS256` and the signing key's `kid`.
//! - Every token expires exactly `TOKEN_LIFETIME` after its `iat`.
//!
//! # Invariants
//! - Issuance is stateless: no storage is touched and no state is mutated.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, Header, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::keys::SigningKeyPair;
use crate::types::Identity;

/// How long an issued token stays valid.
pub const TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Role granted to every authenticated identity.
pub const DEFAULT_ROLE: &str = "user";

/// Claim names the issuer controls. Extra claims using these are dropped.
pub const RESERVED_CLAIMS: [&str; 5] = ["sub", "email", "roles", "iat", "exp"];

/// Claims carried by an issued token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the identity's unique id.
    pub sub: String,
    /// The identity's email handle.
    pub email: String,
    /// Granted roles.
    pub roles: Vec<String>,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: u64,
    /// Expiration, seconds since the Unix epoch.
    pub exp: u64,
    /// Additional caller-supplied claims.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Error returned when a token cannot be issued.
#[derive(Debug)]
pub enum TokenError {
    /// The issuance instant predates the Unix epoch.
    InvalidIssueTime,
    /// Signing with the private key failed.
    Signing(String),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIssueTime => write!(f, "issue time is before the Unix epoch"),
            Self::Signing(reason) => write!(f, "token signing failed: {reason}"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Signs bearer tokens with the process signing key.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key_pair: Arc<SigningKeyPair>,
}

impl TokenIssuer {
    #[must_use]
    pub const fn new(key_pair: Arc<SigningKeyPair>) -> Self {
        Self { key_pair }
    }

    /// Key identifier stamped on every token.
    #[must_use]
    pub fn kid(&self) -> &str {
        self.key_pair.kid()
    }

    /// Issue a signed token for `identity` at instant `now`.
    ///
    /// Entries of `extra` whose names collide with `RESERVED_CLAIMS` are ignored.
    ///
    /// # Errors
    /// Returns `TokenError::InvalidIssueTime` if `now` is before the epoch, or
    /// `TokenError::Signing` if the private key cannot produce a signature.
    pub fn issue(
        &self,
        identity: &Identity,
        extra: Map<String, Value>,
        now: SystemTime,
    ) -> Result<String, TokenError> {
        let claims = build_claims(identity, extra, now)?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.key_pair.kid().to_string());

        encode(&header, &claims, self.key_pair.encoding_key())
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

/// Assemble the claim set for `identity` issued at `now`.
fn build_claims(
    identity: &Identity,
    mut extra: Map<String, Value>,
    now: SystemTime,
) -> Result<TokenClaims, TokenError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| TokenError::InvalidIssueTime)?
        .as_secs();

    for name in RESERVED_CLAIMS {
        if extra.remove(name).is_some() {
            tracing::warn!("ignoring extra claim '{name}' that shadows a reserved claim");
        }
    }

    Ok(TokenClaims {
        sub: identity.id.to_string(),
        email: identity.handle.clone(),
        roles: vec![DEFAULT_ROLE.to_string()],
        iat,
        exp: iat + TOKEN_LIFETIME.as_secs(),
        extra,
    })
}
