//! # obadge-vc — Open Badges 3.0 Verifiable Credentials
//!
//! The credential document model and the proof subsystem around it:
//!
//! - [`credential`] — the typed `OpenBadgeCredential` envelope (rigid
//!   structure, extensible achievement subject) with structure validation.
//! - [`proof`] — the proof object and the suite registry. Three suites:
//!   `DataIntegrityProof`/`eddsa-rdfc-2022` (canonical), plus the legacy
//!   `Ed25519Signature2020` and `JsonWebSignature2020` variants consumed
//!   for backward compatibility.
//! - [`sign`] — proof generation over JCS-canonical bytes. Never mutates
//!   the caller's document.
//! - [`verify`] — the per-call verification state machine producing a
//!   [`VerificationResult`](verify::VerificationResult). Business failures
//!   are values, never `Err`.
//!
//! ## Security Invariants
//!
//! - Signing and verification both canonicalize the document with the
//!   `proof` member removed via `CanonicalBytes`; any byte-level change to
//!   a signed document invalidates its proof by construction.
//! - A proof's verification method must resolve to the controller derived
//!   from the verifying public key — a valid signature from issuer A can
//!   never be replayed as if from issuer B.

pub mod credential;
pub mod proof;
pub mod sign;
pub mod verify;

pub use credential::{
    Achievement, AchievementSubject, CredentialSubject, IssuerProfile, OpenBadgeCredential,
    ProofValue, StatusListEntry, StatusListSubject, StatusPurpose, CONTEXT_CREDENTIALS_V1,
    CONTEXT_OPEN_BADGES_V3, CONTEXT_STATUS_LIST_2021, TYPE_OPEN_BADGE_CREDENTIAL,
    TYPE_STATUS_LIST_CREDENTIAL,
    TYPE_VERIFIABLE_CREDENTIAL,
};
pub use proof::{
    suite_for, suite_of_type, Proof, ProofPurpose, ProofSuite, ProofType, SuiteError,
    CRYPTOSUITE_EDDSA_RDFC_2022,
};
pub use sign::{sign, SignError, SignOptions};
pub use verify::{
    verify, verify_with_key, verify_with_status, CheckFailure, CredentialStatusState, StatusCheck,
    VerificationChecks, VerificationResult,
};
