//! Process-lifetime RSA signing key.
//!
//! # Pre-conditions
//! - The operating system must provide a working CSPRNG.
//!
//! # Post-conditions
//! - `SigningKeyPair::generate` yields a key of at least `MIN_KEY_BITS` bits
//!   together with its public JWK and key identifier.
//!
//! # Invariants
//! - The private half is only reachable as a signing key; nothing in this
//!   module serializes it.
//! - The key identifier is the RFC 7638 thumbprint of the public key, so the
//!   same public key always yields the same `kid`.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::EncodingKey;
use rsa::{
    RsaPrivateKey, RsaPublicKey,
    pkcs1::EncodeRsaPrivateKey,
    rand_core::{OsRng, RngCore},
    traits::PublicKeyParts,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// JWS algorithm used for every issued token.
pub const SIGNING_ALGORITHM: &str = "RS256";

/// Smallest modulus size accepted for a signing key.
pub const MIN_KEY_BITS: usize = 2048;

/// Error returned when the signing key cannot be created.
#[derive(Debug)]
pub enum KeyError {
    /// The operating system random source is unavailable.
    RandomnessUnavailable(String),
    /// The requested key size is below `MIN_KEY_BITS`.
    KeyTooSmall(usize),
    /// RSA key generation failed.
    Generation(String),
    /// The private key could not be converted into a signing key.
    Encoding(String),
}

impl std::fmt::Display for KeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RandomnessUnavailable(reason) => {
                write!(f, "secure randomness unavailable: {reason}")
            }
            Self::KeyTooSmall(bits) => {
                write!(f, "key size {bits} is below the {MIN_KEY_BITS}-bit minimum")
            }
            Self::Generation(reason) => write!(f, "RSA key generation failed: {reason}"),
            Self::Encoding(reason) => write!(f, "failed to encode signing key: {reason}"),
        }
    }
}

impl std::error::Error for KeyError {}

/// Public half of a signing key as a JSON Web Key (RFC 7517).
///
/// Only public RSA parameters are representable here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicJwk {
    /// Key type, always `RSA`.
    pub kty: String,
    /// Intended use, always `sig`.
    #[serde(rename = "use")]
    pub key_use: String,
    /// Signing algorithm, always `RS256`.
    pub alg: String,
    /// Key identifier.
    pub kid: String,
    /// Modulus, base64url without padding.
    pub n: String,
    /// Public exponent, base64url without padding.
    pub e: String,
}

/// Derive the key identifier and public JWK for an RSA public key.
///
/// The `kid` is the RFC 7638 SHA-256 thumbprint: the hash of the required
/// members in lexicographic order with no whitespace.
#[must_use]
pub fn derive_public_jwk(public_key: &RsaPublicKey) -> PublicJwk {
    let n = URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be());
    let e = URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be());

    let canonical = format!(r#"{{"e":"{e}","kty":"RSA","n":"{n}"}}"#);
    let kid = URL_SAFE_NO_PAD.encode(Sha256::digest(canonical.as_bytes()));

    PublicJwk {
        kty: "RSA".to_string(),
        key_use: "sig".to_string(),
        alg: SIGNING_ALGORITHM.to_string(),
        kid,
        n,
        e,
    }
}

/// The signing key pair for this process.
///
/// Created once at boot and shared read-only afterwards.
pub struct SigningKeyPair {
    encoding_key: EncodingKey,
    public_jwk: PublicJwk,
    bits: usize,
}

impl std::fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyPair")
            .field("kid", &self.public_jwk.kid)
            .field("bits", &self.bits)
            .finish_non_exhaustive()
    }
}

impl SigningKeyPair {
    /// Generate a fresh key pair from the OS random source.
    ///
    /// Blocks for the duration of RSA prime generation. Only call during startup.
    ///
    /// # Errors
    /// Returns `KeyError` if randomness is unavailable, the size is too small,
    /// or generation fails. Every variant is fatal to the process.
    pub fn generate(bits: usize) -> Result<Self, KeyError> {
        if bits < MIN_KEY_BITS {
            return Err(KeyError::KeyTooSmall(bits));
        }

        // OsRng panics inside key generation if the source fails, so probe it first.
        let mut probe = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut probe)
            .map_err(|e| KeyError::RandomnessUnavailable(e.to_string()))?;

        let private_key =
            RsaPrivateKey::new(&mut OsRng, bits).map_err(|e| KeyError::Generation(e.to_string()))?;
        Self::from_private_key(&private_key)
    }

    /// Build a key pair around an existing RSA private key.
    ///
    /// # Errors
    /// Returns `KeyError::Encoding` if the key cannot be DER-encoded.
    pub fn from_private_key(private_key: &RsaPrivateKey) -> Result<Self, KeyError> {
        let bits = private_key.size() * 8;
        if bits < MIN_KEY_BITS {
            return Err(KeyError::KeyTooSmall(bits));
        }

        let der = private_key
            .to_pkcs1_der()
            .map_err(|e| KeyError::Encoding(e.to_string()))?;
        let encoding_key = EncodingKey::from_rsa_der(der.as_bytes());
        let public_jwk = derive_public_jwk(&private_key.to_public_key());

        Ok(Self {
            encoding_key,
            public_jwk,
            bits,
        })
    }

    /// Key identifier attached to tokens and the published key set.
    #[must_use]
    pub fn kid(&self) -> &str {
        &self.public_jwk.kid
    }

    /// Public verification key.
    #[must_use]
    pub const fn public_jwk(&self) -> &PublicJwk {
        &self.public_jwk
    }

    /// Modulus size in bits.
    #[must_use]
    pub const fn bits(&self) -> usize {
        self.bits
    }

    pub(crate) const fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }
}
