//! Credential verification.
//!
//! Verification is a pipeline of checks; every business-rule failure is
//! reported as a value on [`VerificationResult`], never as an `Err`. The
//! pipeline runs:
//!
//! 1. structural validation
//! 2. proof presence
//! 3. per proof: suite resolution, key binding, canonicalization,
//!    signature
//! 4. revocation/suspension (when a status checker is supplied and the
//!    credential carries a `credentialStatus` entry)
//! 5. expiration
//!
//! A credential with several proofs verifies when at least one proof
//! passes; failures from the losing proofs are still reported.
//!
//! Keys resolve from the proof's `did:key` verification method itself —
//! the DID encodes the public key, so no external registry is consulted.
//! The key-binding check ties that method to the credential's issuer.

use obadge_crypto::{
    controller_of, did_key_from_public, public_key_from_did_key, verify_with_public_key,
    CryptoError, Ed25519PublicKey,
};

use crate::credential::{OpenBadgeCredential, StatusListEntry};
use crate::proof::{suite_for, SuiteError};

/// A revocation-status oracle consulted during verification.
///
/// Implemented by the status-list coordinator; verification stays
/// decoupled from how lists are stored or fetched.
pub trait StatusCheck: Send + Sync {
    /// Resolve the current status of a credential's list entry.
    fn status_of(&self, entry: &StatusListEntry) -> Result<CredentialStatusState, String>;
}

/// The status of a credential on its status list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatusState {
    /// Bit clear.
    Active,
    /// Bit set on a revocation-purpose list.
    Revoked,
    /// Bit set on a suspension-purpose list.
    Suspended,
}

/// A single reason verification did not pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckFailure {
    /// Required fields missing or malformed.
    InvalidStructure(String),
    /// The credential carries no proof.
    MissingProof,
    /// A proof named a suite this stack does not implement.
    UnsupportedProofType(String),
    /// A `DataIntegrityProof` named an unknown cryptosuite.
    UnsupportedCryptosuite(String),
    /// The proof's signature field was absent or undecodable.
    MalformedProof(String),
    /// The proof's verification method is not controlled by the expected
    /// key.
    KeyMismatch {
        /// The expected controller: the credential's issuer DID, or the
        /// `did:key` of a caller-supplied verification key.
        issuer: String,
        /// The controller of the proof's verification method.
        controller: String,
    },
    /// The signature did not verify over the canonical document.
    InvalidSignature,
    /// The status list marks this credential revoked.
    Revoked,
    /// The status list marks this credential suspended.
    Suspended,
    /// The status list could not be consulted.
    StatusUnavailable(String),
    /// `expirationDate` is in the past.
    Expired,
}

impl std::fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckFailure::InvalidStructure(msg) => write!(f, "invalid structure: {msg}"),
            CheckFailure::MissingProof => f.write_str("credential has no proof"),
            CheckFailure::UnsupportedProofType(t) => write!(f, "unsupported proof type: {t}"),
            CheckFailure::UnsupportedCryptosuite(c) => write!(f, "unsupported cryptosuite: {c}"),
            CheckFailure::MalformedProof(msg) => write!(f, "malformed proof: {msg}"),
            CheckFailure::KeyMismatch { issuer, controller } => write!(
                f,
                "verification method controlled by {controller}, issuer is {issuer}"
            ),
            CheckFailure::InvalidSignature => f.write_str("signature verification failed"),
            CheckFailure::Revoked => f.write_str("credential is revoked"),
            CheckFailure::Suspended => f.write_str("credential is suspended"),
            CheckFailure::StatusUnavailable(msg) => write!(f, "status check unavailable: {msg}"),
            CheckFailure::Expired => f.write_str("credential is expired"),
        }
    }
}

/// Which pipeline stages ran, and how they came out.
///
/// `status` stays `None` when no status checker was supplied or the
/// credential has no `credentialStatus` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationChecks {
    pub structure: bool,
    pub proof: bool,
    pub status: Option<bool>,
    pub expiration: bool,
}

/// The outcome of verifying a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// True only when every executed check passed.
    pub verified: bool,
    /// Per-stage outcomes.
    pub checks: VerificationChecks,
    /// Every failure encountered, in pipeline order.
    pub failures: Vec<CheckFailure>,
}

impl VerificationResult {
    fn failed(checks: VerificationChecks, failures: Vec<CheckFailure>) -> Self {
        Self {
            verified: false,
            checks,
            failures,
        }
    }
}

fn suite_failure(err: SuiteError) -> CheckFailure {
    match err {
        SuiteError::UnsupportedProofType(t) => CheckFailure::UnsupportedProofType(t),
        SuiteError::UnsupportedCryptosuite(c) => CheckFailure::UnsupportedCryptosuite(c),
        SuiteError::MalformedEncoding(msg) => CheckFailure::MalformedProof(msg),
    }
}

/// Verify a credential's proofs and expiration. Revocation is skipped;
/// use [`verify_with_status`] to include it.
pub fn verify(credential: &OpenBadgeCredential) -> VerificationResult {
    verify_inner(credential, None, None)
}

/// Verify against a caller-supplied public key instead of the issuer
/// binding. A proof whose verification method is not controlled by the
/// `did:key` derived from `public_key` fails with
/// [`CheckFailure::KeyMismatch`], and the signature is checked against
/// the supplied key only — a verifier holding a trusted key can pin the
/// whole verification to it.
pub fn verify_with_key(
    credential: &OpenBadgeCredential,
    public_key: &Ed25519PublicKey,
) -> VerificationResult {
    verify_inner(credential, Some(public_key), None)
}

/// Verify a credential including its status-list entry.
pub fn verify_with_status(
    credential: &OpenBadgeCredential,
    status: &dyn StatusCheck,
) -> VerificationResult {
    verify_inner(credential, None, Some(status))
}

fn verify_inner(
    credential: &OpenBadgeCredential,
    expected_key: Option<&Ed25519PublicKey>,
    status: Option<&dyn StatusCheck>,
) -> VerificationResult {
    let mut checks = VerificationChecks {
        structure: true,
        proof: false,
        status: None,
        expiration: true,
    };
    let mut failures = Vec::new();

    let structure_problems = credential.structure_errors();
    if !structure_problems.is_empty() {
        checks.structure = false;
        failures.extend(
            structure_problems
                .into_iter()
                .map(CheckFailure::InvalidStructure),
        );
        return VerificationResult::failed(checks, failures);
    }

    let proofs = credential.proof.as_list();
    if proofs.is_empty() {
        failures.push(CheckFailure::MissingProof);
        return VerificationResult::failed(checks, failures);
    }

    // Canonicalization of the proof-free document is shared by all proofs.
    let signing_input = match credential.signing_input() {
        Ok(bytes) => bytes,
        Err(e) => {
            checks.structure = false;
            failures.push(CheckFailure::InvalidStructure(e.to_string()));
            return VerificationResult::failed(checks, failures);
        }
    };

    for proof in proofs {
        let suite = match suite_for(proof) {
            Ok(s) => s,
            Err(e) => {
                failures.push(suite_failure(e));
                continue;
            }
        };

        let controller = controller_of(&proof.verification_method);
        let public_key = match expected_key {
            // Pinned verification: the proof must name the supplied key's
            // own did:key, and the signature is checked against that key.
            Some(key) => {
                let expected_controller = did_key_from_public(key);
                if controller != expected_controller {
                    failures.push(CheckFailure::KeyMismatch {
                        issuer: expected_controller,
                        controller: controller.to_string(),
                    });
                    continue;
                }
                key.clone()
            }
            None => {
                if controller != credential.issuer.id {
                    failures.push(CheckFailure::KeyMismatch {
                        issuer: credential.issuer.id.clone(),
                        controller: controller.to_string(),
                    });
                    continue;
                }
                match public_key_from_did_key(&proof.verification_method) {
                    Ok(pk) => pk,
                    Err(e) => {
                        failures.push(CheckFailure::MalformedProof(e.to_string()));
                        continue;
                    }
                }
            }
        };

        let signature = match suite.extract_signature(proof) {
            Ok(sig) => sig,
            Err(e) => {
                failures.push(suite_failure(e));
                continue;
            }
        };

        match verify_with_public_key(&signing_input, &signature, &public_key) {
            Ok(()) => {
                checks.proof = true;
                break;
            }
            Err(CryptoError::VerificationFailed(_)) => {
                failures.push(CheckFailure::InvalidSignature)
            }
            Err(e) => failures.push(CheckFailure::MalformedProof(e.to_string())),
        }
    }

    if !checks.proof {
        return VerificationResult::failed(checks, failures);
    }

    if let (Some(oracle), Some(entry)) = (status, credential.credential_status.as_ref()) {
        match oracle.status_of(entry) {
            Ok(CredentialStatusState::Active) => checks.status = Some(true),
            Ok(CredentialStatusState::Revoked) => {
                checks.status = Some(false);
                failures.push(CheckFailure::Revoked);
            }
            Ok(CredentialStatusState::Suspended) => {
                checks.status = Some(false);
                failures.push(CheckFailure::Suspended);
            }
            Err(msg) => {
                checks.status = Some(false);
                failures.push(CheckFailure::StatusUnavailable(msg));
            }
        }
    }

    if let Some(expiry) = &credential.expiration_date {
        if expiry.is_past() {
            checks.expiration = false;
            failures.push(CheckFailure::Expired);
        }
    }

    let verified =
        checks.structure && checks.proof && checks.status != Some(false) && checks.expiration;
    VerificationResult {
        verified,
        checks,
        failures,
    }
}
