use std::sync::{Arc, OnceLock};

use rsa::{RsaPrivateKey, rand_core::OsRng};

use crate::auth::{HashingParams, PasswordHasher, SigningKeyPair};
use crate::service::AuthService;
use crate::store::InMemoryCredentialStore;

static TEST_PRIVATE_KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
static TEST_SIGNING_KEY: OnceLock<Arc<SigningKeyPair>> = OnceLock::new();
static OTHER_SIGNING_KEY: OnceLock<Arc<SigningKeyPair>> = OnceLock::new();

/// RSA private key shared by every test in the process.
///
/// Key generation dominates test time, so it happens once.
#[allow(clippy::expect_used)] // Fixture setup failure aborts the test
pub fn test_private_key() -> &'static RsaPrivateKey {
    TEST_PRIVATE_KEY.get_or_init(|| {
        RsaPrivateKey::new(&mut OsRng, 2048).expect("generate test RSA key")
    })
}

/// Signing key pair wrapping `test_private_key`.
#[allow(clippy::expect_used)] // Fixture setup failure aborts the test
pub fn test_signing_key() -> Arc<SigningKeyPair> {
    Arc::clone(TEST_SIGNING_KEY.get_or_init(|| {
        Arc::new(
            SigningKeyPair::from_private_key(test_private_key()).expect("wrap test RSA key"),
        )
    }))
}

/// A second, unrelated signing key pair.
#[allow(clippy::expect_used)] // Fixture setup failure aborts the test
pub fn other_signing_key() -> Arc<SigningKeyPair> {
    Arc::clone(OTHER_SIGNING_KEY.get_or_init(|| {
        Arc::new(SigningKeyPair::generate(2048).expect("generate second RSA key"))
    }))
}

/// Password hasher with the cheapest parameters Argon2 accepts comfortably.
#[allow(clippy::expect_used)] // Fixture setup failure aborts the test
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(HashingParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid test hashing params")
}

/// Auth service over a fresh in-memory store and the shared test key.
#[allow(clippy::expect_used)] // Fixture setup failure aborts the test
pub fn new_test_service() -> AuthService {
    AuthService::new(
        test_hasher(),
        test_signing_key(),
        Arc::new(InMemoryCredentialStore::new()),
    )
    .expect("build test auth service")
}
