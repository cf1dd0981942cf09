//! Credential storage.
//!
//! The service only needs insert and lookup-by-handle. Durable backends
//! implement `CredentialStore`; `InMemoryCredentialStore` backs the binary
//! and the tests.
//!
//! # Thread Safety
//!
//! The in-memory store uses `RwLock` so concurrent logins read in parallel
//! while registrations take exclusive access.
//!
//! # Invariants
//!
//! - Each handle maps to at most one record.
//! - `insert` is atomic: it either stores the whole record or nothing.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::types::CredentialRecord;

/// Errors returned by a credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A record with this handle already exists.
    Conflict(String),
    /// The store cannot serve requests.
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict(handle) => write!(f, "handle already registered: {handle}"),
            Self::Unavailable(reason) => write!(f, "credential store unavailable: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Persistence for `{identity, password hash}` records.
///
/// Handle uniqueness is the store's responsibility.
pub trait CredentialStore: Send + Sync {
    /// Persist a new record.
    ///
    /// # Errors
    /// Returns `StoreError::Conflict` if the handle is taken.
    fn insert(&self, record: CredentialRecord) -> Result<(), StoreError>;

    /// Look up the record for `handle`.
    ///
    /// # Errors
    /// Returns `StoreError::Unavailable` if the store cannot be read.
    fn find_by_handle(&self, handle: &str) -> Result<Option<CredentialRecord>, StoreError>;

    /// Check that the store can serve requests.
    ///
    /// # Errors
    /// Returns `StoreError::Unavailable` describing the problem.
    fn health(&self) -> Result<(), StoreError>;
}

/// Credential store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    ///
    /// # Errors
    /// Returns `StoreError::Unavailable` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().map_err(|_| lock_poisoned())?.len())
    }
}

fn lock_poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl CredentialStore for InMemoryCredentialStore {
    #[allow(clippy::significant_drop_tightening)] // The lock must cover check and insert
    fn insert(&self, record: CredentialRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| lock_poisoned())?;
        let handle = record.identity.handle.clone();
        if records.contains_key(&handle) {
            return Err(StoreError::Conflict(handle));
        }
        records.insert(handle, record);
        Ok(())
    }

    fn find_by_handle(&self, handle: &str) -> Result<Option<CredentialRecord>, StoreError> {
        let records = self.records.read().map_err(|_| lock_poisoned())?;
        Ok(records.get(handle).cloned())
    }

    fn health(&self) -> Result<(), StoreError> {
        self.records.read().map(|_| ()).map_err(|_| lock_poisoned())
    }
}
