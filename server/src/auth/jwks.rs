//! Public key discovery document.
//!
//! Publishes the signing key's public half as a JSON Web Key Set (RFC 7517,
//! section 5) so any verifier can check tokens without a shared secret.
//!
//! # Invariants
//! - The set holds exactly the key produced at startup for this process.
//! - No private parameters are representable in `PublicJwk`.
//! - The document is fixed for the lifetime of the publisher.

use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};

use super::keys::{PublicJwk, SigningKeyPair};

/// A JSON Web Key Set, addressable by key identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedKeySet {
    keys: Vec<PublicJwk>,
}

impl PublishedKeySet {
    /// Look up a key by its identifier.
    #[must_use]
    pub fn get(&self, kid: &str) -> Option<&PublicJwk> {
        self.keys.iter().find(|key| key.kid == kid)
    }

    /// Identifiers of every published key.
    pub fn kids(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|key| key.kid.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Build a verification key for the entry named `kid`.
    ///
    /// Returns `None` if the kid is unknown or its parameters do not decode.
    #[must_use]
    pub fn decoding_key(&self, kid: &str) -> Option<DecodingKey> {
        let jwk = self.get(kid)?;
        DecodingKey::from_rsa_components(&jwk.n, &jwk.e).ok()
    }
}

/// Serves the process key set.
#[derive(Debug, Clone)]
pub struct KeyPublisher {
    key_set: PublishedKeySet,
}

impl KeyPublisher {
    /// Build the key set from the process signing key.
    #[must_use]
    pub fn new(key_pair: &SigningKeyPair) -> Self {
        Self {
            key_set: PublishedKeySet {
                keys: vec![key_pair.public_jwk().clone()],
            },
        }
    }

    /// The current key set. Identical on every call.
    #[must_use]
    pub const fn current_key_set(&self) -> &PublishedKeySet {
        &self.key_set
    }
}
