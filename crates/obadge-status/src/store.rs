//! # Versioned Status List Storage
//!
//! Lists are stored as their encoded bitstring plus a version counter.
//! Writers read a version, compute the new bitstring, and swap only if
//! the version is unchanged — a losing writer gets
//! [`StatusError::Conflict`] and re-reads. The coordinator wraps this in
//! a bounded retry loop, so concurrent revocations of different
//! credentials on the same list never lose updates.

use std::collections::HashMap;

use parking_lot::RwLock;

use obadge_core::StatusListId;
use obadge_vc::StatusPurpose;

use crate::error::StatusError;

/// A status list row: configuration plus the versioned bitstring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusListRecord {
    pub id: StatusListId,
    /// Public URL of the signed status-list credential.
    pub url: String,
    pub purpose: StatusPurpose,
    pub size_bits: usize,
    /// Base64 bitstring, as published in `encodedList`.
    pub encoded_list: String,
    /// Monotonic write counter for optimistic concurrency.
    pub version: u64,
}

/// Storage for status lists with optimistic concurrency control.
pub trait StatusStore: Send + Sync {
    /// Create a list row. Fails on duplicate id.
    fn create(&self, record: StatusListRecord) -> Result<(), StatusError>;

    /// Load a list by id.
    fn load(&self, id: StatusListId) -> Result<StatusListRecord, StatusError>;

    /// Load a list by its public URL.
    fn load_by_url(&self, url: &str) -> Result<StatusListRecord, StatusError>;

    /// Replace the encoded bitstring if `expected_version` still matches,
    /// bumping the version.
    ///
    /// # Errors
    ///
    /// [`StatusError::Conflict`] when another writer got there first.
    fn compare_and_swap(
        &self,
        id: StatusListId,
        expected_version: u64,
        encoded_list: String,
    ) -> Result<(), StatusError>;
}

/// In-process store backed by a read-write lock.
#[derive(Default)]
pub struct InMemoryStatusStore {
    lists: RwLock<HashMap<StatusListId, StatusListRecord>>,
}

impl InMemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusStore for InMemoryStatusStore {
    fn create(&self, record: StatusListRecord) -> Result<(), StatusError> {
        let mut lists = self.lists.write();
        if lists.contains_key(&record.id) {
            return Err(StatusError::Store(format!(
                "status list {} already exists",
                record.id
            )));
        }
        lists.insert(record.id, record);
        Ok(())
    }

    fn load(&self, id: StatusListId) -> Result<StatusListRecord, StatusError> {
        self.lists
            .read()
            .get(&id)
            .cloned()
            .ok_or(StatusError::UnknownList(id))
    }

    fn load_by_url(&self, url: &str) -> Result<StatusListRecord, StatusError> {
        self.lists
            .read()
            .values()
            .find(|record| record.url == url)
            .cloned()
            .ok_or_else(|| StatusError::Store(format!("no status list at {url}")))
    }

    fn compare_and_swap(
        &self,
        id: StatusListId,
        expected_version: u64,
        encoded_list: String,
    ) -> Result<(), StatusError> {
        let mut lists = self.lists.write();
        let record = lists.get_mut(&id).ok_or(StatusError::UnknownList(id))?;
        if record.version != expected_version {
            return Err(StatusError::Conflict(id));
        }
        record.encoded_list = encoded_list;
        record.version += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstring::create_encoded_bit_string;

    fn record(id: StatusListId) -> StatusListRecord {
        StatusListRecord {
            id,
            url: format!("https://badges.example.org/status/{id}"),
            purpose: StatusPurpose::Revocation,
            size_bits: 64,
            encoded_list: create_encoded_bit_string(64).unwrap(),
            version: 0,
        }
    }

    #[test]
    fn create_and_load() {
        let store = InMemoryStatusStore::new();
        let id = StatusListId::new();
        store.create(record(id)).unwrap();
        let loaded = store.load(id).unwrap();
        assert_eq!(loaded.version, 0);
        assert_eq!(store.load_by_url(&loaded.url).unwrap(), loaded);
    }

    #[test]
    fn duplicate_create_fails() {
        let store = InMemoryStatusStore::new();
        let id = StatusListId::new();
        store.create(record(id)).unwrap();
        assert!(store.create(record(id)).is_err());
    }

    #[test]
    fn load_unknown_list_fails() {
        let store = InMemoryStatusStore::new();
        assert!(matches!(
            store.load(StatusListId::new()),
            Err(StatusError::UnknownList(_))
        ));
    }

    #[test]
    fn cas_succeeds_on_matching_version() {
        let store = InMemoryStatusStore::new();
        let id = StatusListId::new();
        store.create(record(id)).unwrap();
        let updated = create_encoded_bit_string(64).unwrap();
        store.compare_and_swap(id, 0, updated).unwrap();
        assert_eq!(store.load(id).unwrap().version, 1);
    }

    #[test]
    fn cas_rejects_stale_version() {
        let store = InMemoryStatusStore::new();
        let id = StatusListId::new();
        store.create(record(id)).unwrap();
        let encoded = create_encoded_bit_string(64).unwrap();
        store.compare_and_swap(id, 0, encoded.clone()).unwrap();
        let err = store.compare_and_swap(id, 0, encoded).unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, StatusError::Conflict(_)));
    }
}
