//! Identities and the records the credential store keeps for them.

use std::fmt;

use serde::Serialize;

use super::UserId;

/// A registered identity: an opaque id plus an email handle.
///
/// # Invariants
///
/// - Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: UserId,
    #[serde(rename = "email")]
    pub handle: String,
}

impl Identity {
    /// Create an identity with a freshly generated id.
    #[must_use]
    pub fn new(handle: String) -> Self {
        Self {
            id: UserId::new_random(),
            handle,
        }
    }
}

/// What the credential store persists per identity.
///
/// `Debug` omits the hash so records can be logged safely.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub identity: Identity,
    /// Argon2id PHC string. Never returned to callers.
    pub password_hash: String,
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}
