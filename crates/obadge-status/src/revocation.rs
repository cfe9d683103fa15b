//! # Revocation Coordination
//!
//! Ties allocation, storage, and the bitstring codec together:
//!
//! - `assign_entry` gives a credential its `credentialStatus` entry
//!   before signing.
//! - `revoke` flips the credential's bit. Idempotent: revoking an
//!   already-revoked credential reports `already_revoked` and changes
//!   nothing.
//! - `reinstate` clears a bit, allowed only on suspension-purpose lists.
//!
//! Writes go through compare-and-swap with a bounded retry loop, so
//! concurrent revocations of different credentials on one list both land.

use std::sync::Arc;

use parking_lot::Mutex;

use obadge_core::{CredentialId, StatusListId, Timestamp};
use obadge_vc::{CredentialStatusState, StatusCheck, StatusListEntry, StatusPurpose};

use crate::bitstring::{self, Bitstring};
use crate::error::StatusError;
use crate::index::IndexAllocator;
use crate::store::{StatusListRecord, StatusStore};

/// CAS attempts before giving up on a contended list.
const MAX_WRITE_ATTEMPTS: u32 = 5;

/// The result of a revocation or reinstatement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevokeOutcome {
    /// The credential's bit position.
    pub index: u64,
    /// True when the bit already held the requested value.
    pub already_revoked: bool,
}

/// One entry in the revocation audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationRecord {
    pub credential: CredentialId,
    pub list: StatusListId,
    pub index: u64,
    pub reason: Option<String>,
    pub at: Timestamp,
}

/// Coordinates status lists for an issuer.
pub struct RevocationCoordinator {
    store: Arc<dyn StatusStore>,
    allocator: Arc<dyn IndexAllocator>,
    log: Mutex<Vec<RevocationRecord>>,
}

impl RevocationCoordinator {
    pub fn new(store: Arc<dyn StatusStore>, allocator: Arc<dyn IndexAllocator>) -> Self {
        Self {
            store,
            allocator,
            log: Mutex::new(Vec::new()),
        }
    }

    /// Create a new status list published at `url`.
    pub fn create_list(
        &self,
        url: impl Into<String>,
        purpose: StatusPurpose,
        size_bits: usize,
    ) -> Result<StatusListId, StatusError> {
        let id = StatusListId::new();
        let record = StatusListRecord {
            id,
            url: url.into(),
            purpose,
            size_bits,
            encoded_list: bitstring::create_encoded_bit_string(size_bits)?,
            version: 0,
        };
        tracing::info!(list = %id, %purpose, size_bits, "status list created");
        self.store.create(record)?;
        Ok(id)
    }

    /// Allocate a bit position for `credential` on `list` and build the
    /// `credentialStatus` entry to embed before signing.
    pub fn assign_entry(
        &self,
        list: StatusListId,
        credential: CredentialId,
    ) -> Result<StatusListEntry, StatusError> {
        let record = self.store.load(list)?;
        let index = self
            .allocator
            .allocate(list, credential, record.size_bits)?;
        Ok(StatusListEntry {
            id: format!("{}#{index}", record.url),
            entry_type: "StatusList2021Entry".to_string(),
            status_purpose: record.purpose,
            status_list_index: index.to_string(),
            status_list_credential: record.url,
        })
    }

    /// Set the credential's status bit. Idempotent.
    pub fn revoke(
        &self,
        credential: CredentialId,
        reason: Option<&str>,
    ) -> Result<RevokeOutcome, StatusError> {
        let (list, index) = self
            .allocator
            .index_of(credential)
            .ok_or(StatusError::UnknownCredential(credential))?;
        let previous = self.write_bit(list, index, true)?;
        let mut log = self.log.lock();
        if !previous {
            tracing::info!(%credential, %list, index, reason, "credential revoked");
            log.push(RevocationRecord {
                credential,
                list,
                index,
                reason: reason.map(str::to_string),
                at: Timestamp::now(),
            });
        } else if let Some(reason) = reason {
            // The bit is already set; a repeat call still carries the
            // latest reason.
            if let Some(record) = log
                .iter_mut()
                .rev()
                .find(|record| record.credential == credential)
            {
                tracing::debug!(%credential, reason, "revocation reason updated");
                record.reason = Some(reason.to_string());
            }
        }
        drop(log);
        Ok(RevokeOutcome {
            index,
            already_revoked: previous,
        })
    }

    /// Clear the credential's status bit. Only suspension lists support
    /// this; a revocation list's 0→1 transition is one-way.
    pub fn reinstate(&self, credential: CredentialId) -> Result<RevokeOutcome, StatusError> {
        let (list, index) = self
            .allocator
            .index_of(credential)
            .ok_or(StatusError::UnknownCredential(credential))?;
        let record = self.store.load(list)?;
        if record.purpose != StatusPurpose::Suspension {
            return Err(StatusError::NotReversible(list));
        }
        let previous = self.write_bit(list, index, false)?;
        if previous {
            tracing::info!(%credential, %list, index, "credential reinstated");
        }
        Ok(RevokeOutcome {
            index,
            already_revoked: previous,
        })
    }

    /// Whether the credential's bit is set. Read-only, no retry needed.
    pub fn is_revoked(&self, credential: CredentialId) -> Result<bool, StatusError> {
        let (list, index) = self
            .allocator
            .index_of(credential)
            .ok_or(StatusError::UnknownCredential(credential))?;
        let record = self.store.load(list)?;
        bitstring::get_status(&record.encoded_list, index)
    }

    /// The current published bitstring of a list.
    pub fn encoded_list(&self, list: StatusListId) -> Result<String, StatusError> {
        Ok(self.store.load(list)?.encoded_list)
    }

    /// Load a list's full record.
    pub fn list_record(&self, list: StatusListId) -> Result<StatusListRecord, StatusError> {
        self.store.load(list)
    }

    /// Snapshot of the revocation audit log.
    pub fn revocation_log(&self) -> Vec<RevocationRecord> {
        self.log.lock().clone()
    }

    /// Read-modify-CAS of one bit, retried on version conflicts.
    /// Returns the bit's previous value.
    fn write_bit(
        &self,
        list: StatusListId,
        index: u64,
        value: bool,
    ) -> Result<bool, StatusError> {
        let mut attempts = 0;
        loop {
            let record = self.store.load(list)?;
            let mut bits = Bitstring::decode(&record.encoded_list)?;
            let previous = bits.set(index, value)?;
            if previous == value {
                return Ok(previous);
            }
            match self
                .store
                .compare_and_swap(list, record.version, bits.encode())
            {
                Ok(()) => return Ok(previous),
                Err(err) if err.is_retryable() => {
                    attempts += 1;
                    if attempts >= MAX_WRITE_ATTEMPTS {
                        tracing::warn!(%list, index, attempts, "status write gave up");
                        return Err(err);
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl StatusCheck for RevocationCoordinator {
    fn status_of(&self, entry: &StatusListEntry) -> Result<CredentialStatusState, String> {
        let record = self
            .store
            .load_by_url(&entry.status_list_credential)
            .map_err(|e| e.to_string())?;
        let index = entry.index()?;
        let set = bitstring::get_status(&record.encoded_list, index).map_err(|e| e.to_string())?;
        Ok(match (set, record.purpose) {
            (false, _) => CredentialStatusState::Active,
            (true, StatusPurpose::Revocation) => CredentialStatusState::Revoked,
            (true, StatusPurpose::Suspension) => CredentialStatusState::Suspended,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstring::DEFAULT_SIZE_BITS;
    use crate::index::InMemoryIndexAllocator;
    use crate::store::InMemoryStatusStore;

    fn coordinator() -> RevocationCoordinator {
        RevocationCoordinator::new(
            Arc::new(InMemoryStatusStore::new()),
            Arc::new(InMemoryIndexAllocator::new()),
        )
    }

    #[test]
    fn assign_entry_shapes_the_status_entry() {
        let coordinator = coordinator();
        let list = coordinator
            .create_list(
                "https://badges.example.org/status/1",
                StatusPurpose::Revocation,
                DEFAULT_SIZE_BITS,
            )
            .unwrap();
        let entry = coordinator.assign_entry(list, CredentialId::new()).unwrap();
        assert_eq!(entry.entry_type, "StatusList2021Entry");
        assert_eq!(entry.status_purpose, StatusPurpose::Revocation);
        assert_eq!(entry.status_list_index, "0");
        assert_eq!(
            entry.status_list_credential,
            "https://badges.example.org/status/1"
        );
        assert_eq!(entry.id, "https://badges.example.org/status/1#0");
    }

    #[test]
    fn revoke_sets_only_the_assigned_bit() {
        let coordinator = coordinator();
        let list = coordinator
            .create_list("https://e/s/1", StatusPurpose::Revocation, 256)
            .unwrap();
        let target = CredentialId::new();
        let bystander = CredentialId::new();
        coordinator.assign_entry(list, target).unwrap();
        coordinator.assign_entry(list, bystander).unwrap();

        let outcome = coordinator.revoke(target, Some("terms violation")).unwrap();
        assert!(!outcome.already_revoked);
        assert!(coordinator.is_revoked(target).unwrap());
        assert!(!coordinator.is_revoked(bystander).unwrap());
    }

    #[test]
    fn revoke_is_idempotent() {
        let coordinator = coordinator();
        let list = coordinator
            .create_list("https://e/s/1", StatusPurpose::Revocation, 64)
            .unwrap();
        let credential = CredentialId::new();
        coordinator.assign_entry(list, credential).unwrap();

        let first = coordinator.revoke(credential, None).unwrap();
        let second = coordinator.revoke(credential, None).unwrap();
        assert!(!first.already_revoked);
        assert!(second.already_revoked);
        assert_eq!(coordinator.revocation_log().len(), 1);

        let version = coordinator.list_record(list).unwrap().version;
        let _ = coordinator.revoke(credential, None).unwrap();
        assert_eq!(coordinator.list_record(list).unwrap().version, version);
    }

    #[test]
    fn repeat_revoke_updates_the_reason() {
        let coordinator = coordinator();
        let list = coordinator
            .create_list("https://e/s/1", StatusPurpose::Revocation, 64)
            .unwrap();
        let credential = CredentialId::new();
        coordinator.assign_entry(list, credential).unwrap();

        coordinator.revoke(credential, Some("clerical error")).unwrap();
        let second = coordinator
            .revoke(credential, Some("academic misconduct"))
            .unwrap();
        assert!(second.already_revoked);

        let log = coordinator.revocation_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].reason.as_deref(), Some("academic misconduct"));

        // A repeat without a reason leaves the recorded one alone.
        coordinator.revoke(credential, None).unwrap();
        assert_eq!(
            coordinator.revocation_log()[0].reason.as_deref(),
            Some("academic misconduct")
        );
    }

    #[test]
    fn revoking_unknown_credential_fails() {
        let coordinator = coordinator();
        assert!(matches!(
            coordinator.revoke(CredentialId::new(), None),
            Err(StatusError::UnknownCredential(_))
        ));
    }

    #[test]
    fn reinstate_requires_suspension_list() {
        let coordinator = coordinator();
        let revocation = coordinator
            .create_list("https://e/s/rev", StatusPurpose::Revocation, 64)
            .unwrap();
        let suspension = coordinator
            .create_list("https://e/s/sus", StatusPurpose::Suspension, 64)
            .unwrap();

        let permanent = CredentialId::new();
        coordinator.assign_entry(revocation, permanent).unwrap();
        coordinator.revoke(permanent, None).unwrap();
        assert!(matches!(
            coordinator.reinstate(permanent),
            Err(StatusError::NotReversible(_))
        ));
        assert!(coordinator.is_revoked(permanent).unwrap());

        let paused = CredentialId::new();
        coordinator.assign_entry(suspension, paused).unwrap();
        coordinator.revoke(paused, Some("dues lapsed")).unwrap();
        assert!(coordinator.is_revoked(paused).unwrap());
        coordinator.reinstate(paused).unwrap();
        assert!(!coordinator.is_revoked(paused).unwrap());
    }

    #[test]
    fn status_check_maps_bits_to_states() {
        let coordinator = coordinator();
        let list = coordinator
            .create_list("https://e/s/sus", StatusPurpose::Suspension, 64)
            .unwrap();
        let credential = CredentialId::new();
        let entry = coordinator.assign_entry(list, credential).unwrap();

        assert_eq!(
            coordinator.status_of(&entry).unwrap(),
            CredentialStatusState::Active
        );
        coordinator.revoke(credential, None).unwrap();
        assert_eq!(
            coordinator.status_of(&entry).unwrap(),
            CredentialStatusState::Suspended
        );
    }

    #[test]
    fn concurrent_revocations_both_land() {
        let coordinator = Arc::new(coordinator());
        let list = coordinator
            .create_list("https://e/s/1", StatusPurpose::Revocation, 256)
            .unwrap();

        let credentials: Vec<CredentialId> = (0..32).map(|_| CredentialId::new()).collect();
        for &c in &credentials {
            coordinator.assign_entry(list, c).unwrap();
        }

        let handles: Vec<_> = credentials
            .iter()
            .map(|&c| {
                let coordinator = Arc::clone(&coordinator);
                std::thread::spawn(move || {
                    let mut backoff = 0u32;
                    loop {
                        match coordinator.revoke(c, None) {
                            Ok(outcome) => return outcome,
                            Err(e) if e.is_retryable() => {
                                backoff += 1;
                                assert!(backoff < 100, "revocation never settled");
                                std::thread::yield_now();
                            }
                            Err(e) => panic!("revocation failed: {e}"),
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for &c in &credentials {
            assert!(coordinator.is_revoked(c).unwrap());
        }
        assert_eq!(coordinator.revocation_log().len(), 32);
    }
}
