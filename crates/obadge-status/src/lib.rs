//! # obadge-status — Status List 2021 Revocation
//!
//! Revocation and suspension for issued badge credentials, published as
//! Status List 2021 bitstrings:
//!
//! - [`bitstring`] — the pure codec: MSB-first bit packing, base64
//!   `encodedList` encoding.
//! - [`index`] — monotonic per-list index allocation. Two credentials can
//!   never share a bit position.
//! - [`store`] — versioned list storage with compare-and-swap writes.
//! - [`revocation`] — the coordinator: entry assignment before signing,
//!   idempotent revocation with bounded retry under contention,
//!   suspension-only reinstatement, and the verifier-facing
//!   [`StatusCheck`](obadge_vc::StatusCheck) implementation.
//! - [`credential`] — drafting the publishable status-list credential,
//!   signed through the ordinary credential signing path.

pub mod bitstring;
pub mod credential;
pub mod error;
pub mod index;
pub mod revocation;
pub mod store;

pub use bitstring::{
    create_encoded_bit_string, get_status, update_status, Bitstring, DEFAULT_SIZE_BITS,
};
pub use credential::build_status_list_credential;
pub use error::StatusError;
pub use index::{InMemoryIndexAllocator, IndexAllocator};
pub use revocation::{RevocationCoordinator, RevocationRecord, RevokeOutcome};
pub use store::{InMemoryStatusStore, StatusListRecord, StatusStore};
