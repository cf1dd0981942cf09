//! Password hashing with Argon2id.
//!
//! # Pre-conditions
//! - Hashing parameters must be accepted by Argon2 (see `HashingParams::validate`).
//!
//! # Post-conditions
//! - `hash` returns a PHC string embedding algorithm, cost parameters and a fresh salt.
//! - `verify` never errors for a wrong password; a malformed stored hash is an
//!   error, as is a computation that fails to complete.
//!
//! # Invariants
//! - Plaintext passwords and hashes are never logged.
//! - Verification uses the parameters embedded in the stored hash, so raising
//!   the work factor does not invalidate existing credentials.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
    },
};

/// Error returned by password hashing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// The hashing computation could not complete.
    Hashing(String),
    /// The stored hash is not a valid PHC string.
    MalformedHash,
    /// The cost parameters are not accepted by Argon2.
    InvalidParams(String),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hashing(reason) => write!(f, "password hashing failed: {reason}"),
            Self::MalformedHash => write!(f, "stored password hash is malformed"),
            Self::InvalidParams(reason) => write!(f, "invalid hashing parameters: {reason}"),
        }
    }
}

impl std::error::Error for PasswordError {}

/// Argon2id work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes over memory.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for HashingParams {
    /// OWASP recommended baseline: m=19456 KiB, t=2, p=1.
    fn default() -> Self {
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HashingParams {
    /// Check that Argon2 accepts these parameters.
    ///
    /// # Errors
    /// Returns `PasswordError::InvalidParams` describing the rejected value.
    pub fn validate(&self) -> Result<(), PasswordError> {
        self.to_argon2_params().map(|_| ())
    }

    fn to_argon2_params(self) -> Result<Params, PasswordError> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))
    }
}

/// Hashes and verifies passwords.
///
/// Holds no mutable state; cloning is cheap and every clone behaves identically.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    /// Shared across clones so tests can see work done on blocking workers.
    #[cfg(test)]
    hash_calls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl PasswordHasher {
    /// Create a hasher with the given work factor.
    ///
    /// # Errors
    /// Returns `PasswordError::InvalidParams` if Argon2 rejects the parameters.
    pub fn new(params: HashingParams) -> Result<Self, PasswordError> {
        Ok(Self {
            params: params.to_argon2_params()?,
            #[cfg(test)]
            hash_calls: std::sync::Arc::default(),
        })
    }

    /// Number of `hash` calls made through this hasher or any of its clones.
    #[cfg(test)]
    pub(crate) fn hash_calls(&self) -> usize {
        self.hash_calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a freshly generated salt.
    ///
    /// This is deliberately slow. Callers on an async runtime should run it on a
    /// blocking worker.
    ///
    /// # Errors
    /// Returns `PasswordError::Hashing` if the computation cannot complete.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        #[cfg(test)]
        self.hash_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// The derived output is compared in constant time.
    ///
    /// # Errors
    /// Returns `PasswordError::MalformedHash` if `hash` cannot be parsed or
    /// names an unsupported algorithm, version or parameter set, and
    /// `PasswordError::Hashing` if the computation itself fails.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::MalformedHash)?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(classify_verify_error(e)),
        }
    }
}

/// Split verification failures into computation faults and bad stored hashes.
fn classify_verify_error(error: argon2::password_hash::Error) -> PasswordError {
    use argon2::password_hash::Error;

    match error {
        Error::Crypto | Error::OutputSize { .. } => PasswordError::Hashing(error.to_string()),
        _ => PasswordError::MalformedHash,
    }
}
