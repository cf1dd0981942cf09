//! Authentication module.
//!
//! Password hashing, the process signing key, token issuance and key
//! publication.
//!
//! # Pre-conditions
//! - The signing key is generated once at startup, before any request is served.
//!
//! # Post-conditions
//! - Everything derived from the signing key is immutable once built.
//!
//! # Invariants
//! - Private key material never leaves `keys`; other modules only see the
//!   public JWK or sign through `TokenIssuer`.

pub mod jwks;
pub mod keys;
pub mod password;
pub mod token;

pub use jwks::{KeyPublisher, PublishedKeySet};
pub use keys::{KeyError, PublicJwk, SigningKeyPair};
pub use password::{HashingParams, PasswordError, PasswordHasher};
pub use token::{TOKEN_LIFETIME, TokenClaims, TokenError, TokenIssuer};
