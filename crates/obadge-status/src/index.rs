//! # Status Index Allocation
//!
//! Hands out bit positions on a status list. Allocation is a monotonic
//! per-list counter: every credential gets a fresh index, two credentials
//! can never share one, and a list reports full exactly when its counter
//! reaches capacity. Allocation is idempotent per credential — asking
//! again for a credential that already holds an index returns that index.

use std::collections::HashMap;

use parking_lot::Mutex;

use obadge_core::{CredentialId, StatusListId};

use crate::error::StatusError;

/// Allocates status-list bit positions to credentials.
pub trait IndexAllocator: Send + Sync {
    /// The index held by `credential` on `list`, allocating a fresh one if
    /// it has none.
    ///
    /// # Errors
    ///
    /// [`StatusError::ListFull`] when every position on the list has been
    /// handed out.
    fn allocate(
        &self,
        list: StatusListId,
        credential: CredentialId,
        capacity_bits: usize,
    ) -> Result<u64, StatusError>;

    /// The index held by `credential`, if any.
    fn index_of(&self, credential: CredentialId) -> Option<(StatusListId, u64)>;
}

#[derive(Default)]
struct AllocatorState {
    next_index: HashMap<StatusListId, u64>,
    assignments: HashMap<CredentialId, (StatusListId, u64)>,
}

/// In-process allocator backed by a mutex-guarded counter table.
#[derive(Default)]
pub struct InMemoryIndexAllocator {
    state: Mutex<AllocatorState>,
}

impl InMemoryIndexAllocator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndexAllocator for InMemoryIndexAllocator {
    fn allocate(
        &self,
        list: StatusListId,
        credential: CredentialId,
        capacity_bits: usize,
    ) -> Result<u64, StatusError> {
        let mut state = self.state.lock();
        if let Some(&(held_list, index)) = state.assignments.get(&credential) {
            if held_list == list {
                return Ok(index);
            }
        }
        let counter = state.next_index.entry(list).or_insert(0);
        if *counter >= capacity_bits as u64 {
            return Err(StatusError::ListFull(list));
        }
        let index = *counter;
        *counter += 1;
        state.assignments.insert(credential, (list, index));
        Ok(index)
    }

    fn index_of(&self, credential: CredentialId) -> Option<(StatusListId, u64)> {
        self.state.lock().assignments.get(&credential).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_sequential_and_unique() {
        let allocator = InMemoryIndexAllocator::new();
        let list = StatusListId::new();
        for expected in 0..100u64 {
            let index = allocator
                .allocate(list, CredentialId::new(), 16_384)
                .unwrap();
            assert_eq!(index, expected);
        }
    }

    #[test]
    fn allocation_is_idempotent_per_credential() {
        let allocator = InMemoryIndexAllocator::new();
        let list = StatusListId::new();
        let credential = CredentialId::new();
        let first = allocator.allocate(list, credential, 16_384).unwrap();
        let second = allocator.allocate(list, credential, 16_384).unwrap();
        assert_eq!(first, second);
        // No counter was burned on the repeat.
        let next = allocator
            .allocate(list, CredentialId::new(), 16_384)
            .unwrap();
        assert_eq!(next, first + 1);
    }

    #[test]
    fn full_list_is_reported() {
        let allocator = InMemoryIndexAllocator::new();
        let list = StatusListId::new();
        for _ in 0..8 {
            allocator.allocate(list, CredentialId::new(), 8).unwrap();
        }
        let err = allocator
            .allocate(list, CredentialId::new(), 8)
            .unwrap_err();
        assert!(matches!(err, StatusError::ListFull(_)));
    }

    #[test]
    fn lists_count_independently() {
        let allocator = InMemoryIndexAllocator::new();
        let a = StatusListId::new();
        let b = StatusListId::new();
        assert_eq!(allocator.allocate(a, CredentialId::new(), 64).unwrap(), 0);
        assert_eq!(allocator.allocate(a, CredentialId::new(), 64).unwrap(), 1);
        assert_eq!(allocator.allocate(b, CredentialId::new(), 64).unwrap(), 0);
    }

    #[test]
    fn index_of_reflects_assignment() {
        let allocator = InMemoryIndexAllocator::new();
        let list = StatusListId::new();
        let credential = CredentialId::new();
        assert!(allocator.index_of(credential).is_none());
        let index = allocator.allocate(list, credential, 64).unwrap();
        assert_eq!(allocator.index_of(credential), Some((list, index)));
    }

    #[test]
    fn concurrent_allocation_yields_distinct_indices() {
        use std::sync::Arc;

        let allocator = Arc::new(InMemoryIndexAllocator::new());
        let list = StatusListId::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|_| allocator.allocate(list, CredentialId::new(), 16_384).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = std::collections::HashSet::new();
        for handle in handles {
            for index in handle.join().unwrap() {
                assert!(seen.insert(index), "index {index} allocated twice");
            }
        }
        assert_eq!(seen.len(), 400);
    }
}
