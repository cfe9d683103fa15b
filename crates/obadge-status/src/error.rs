//! Status subsystem errors.

use thiserror::Error;

use obadge_core::{CredentialId, StatusListId};

/// Errors from bitstring handling, index allocation, and revocation.
#[derive(Error, Debug)]
pub enum StatusError {
    /// List sizes must be a positive multiple of 8 bits.
    #[error("invalid status list size: {0} bits (must be a positive multiple of 8)")]
    InvalidSize(usize),

    /// A bit index beyond the end of the list.
    #[error("status index {index} out of range for a list of {size} bits")]
    OutOfRange {
        index: u64,
        size: usize,
    },

    /// The encoded list could not be decoded.
    #[error("malformed encoded list: {0}")]
    MalformedEncoding(String),

    /// Every index on the list has been handed out.
    #[error("status list {0} is full")]
    ListFull(StatusListId),

    /// A concurrent writer updated the list first. Retryable.
    #[error("concurrent update on status list {0}")]
    Conflict(StatusListId),

    /// The credential has no entry on any known list.
    #[error("no status entry for credential {0}")]
    UnknownCredential(CredentialId),

    /// The list is not registered with this coordinator.
    #[error("unknown status list {0}")]
    UnknownList(StatusListId),

    /// Clearing a bit on a revocation-purpose list.
    #[error("revocation is permanent on list {0}; only suspension lists support reinstatement")]
    NotReversible(StatusListId),

    /// Underlying store failure.
    #[error("status store: {0}")]
    Store(String),
}

impl StatusError {
    /// Whether the caller may retry the operation as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StatusError::Conflict(_))
    }
}
