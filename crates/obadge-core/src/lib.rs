//! # obadge-core — Foundational Types for the Open Badge Stack
//!
//! This crate is the leaf of the workspace DAG. It defines the primitives
//! every other crate builds on:
//!
//! 1. **`CanonicalBytes`.** The single construction path for bytes used in
//!    proof generation and verification. A credential signature is only
//!    meaningful if signer and verifier serialize the document to the same
//!    byte sequence; the newtype makes any other serialization path a
//!    compile error.
//!
//! 2. **UTC-only timestamps.** `Timestamp` enforces Z-suffixed ISO 8601 at
//!    second precision so that `issuanceDate`, `expirationDate`, and proof
//!    `created` values canonicalize deterministically.
//!
//! 3. **Identifier newtypes.** `IssuerId`, `CredentialId`, `StatusListId` —
//!    no bare strings or naked UUIDs for identifiers that must never be
//!    confused with one another.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `obadge-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod error;
pub mod identity;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use error::{CanonicalizationError, CoreError};
pub use identity::{CredentialId, IssuerId, StatusListId};
pub use temporal::Timestamp;
