//! Credential signing.
//!
//! One signing path: canonicalize the proof-free document, sign the
//! canonical bytes with the issuer key, attach the suite's proof object.
//! The input credential is not mutated — signing returns a new document.

use thiserror::Error;

use obadge_core::{CanonicalizationError, Timestamp};
use obadge_crypto::KeyPair;

use crate::credential::OpenBadgeCredential;
use crate::proof::{suite_of_type, ProofPurpose, ProofType, SuiteError};

/// Errors from the signing path.
#[derive(Error, Debug)]
pub enum SignError {
    /// The document failed structural validation before signing.
    #[error("credential structure invalid: {0}")]
    InvalidStructure(String),

    /// The document could not be canonicalized.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    /// The requested proof suite cannot sign.
    #[error(transparent)]
    Suite(#[from] SuiteError),
}

/// Options controlling how a proof is produced.
#[derive(Debug, Clone)]
pub struct SignOptions {
    /// The proof suite to emit. Defaults to `DataIntegrityProof` with
    /// `eddsa-rdfc-2022`.
    pub proof_type: ProofType,
    /// The proof purpose. Defaults to `assertionMethod`.
    pub proof_purpose: ProofPurpose,
    /// Proof creation time; `None` means now.
    pub created: Option<Timestamp>,
}

impl Default for SignOptions {
    fn default() -> Self {
        Self {
            proof_type: ProofType::DataIntegrityProof,
            proof_purpose: ProofPurpose::AssertionMethod,
            created: None,
        }
    }
}

/// Sign a credential with the issuer's key pair, returning a new document
/// with the proof attached. Any proofs already present are preserved and
/// the new proof is appended.
///
/// # Errors
///
/// - [`SignError::InvalidStructure`] when required fields are missing or
///   malformed.
/// - [`SignError::Canonicalization`] when the document cannot be JCS
///   serialized (for example, it contains a float).
/// - [`SignError::Suite`] when `options.proof_type` is not a signable
///   suite.
pub fn sign(
    credential: &OpenBadgeCredential,
    key: &KeyPair,
    options: &SignOptions,
) -> Result<OpenBadgeCredential, SignError> {
    let problems = credential.structure_errors();
    if !problems.is_empty() {
        return Err(SignError::InvalidStructure(problems.join("; ")));
    }

    let suite = suite_of_type(&options.proof_type)?;
    let input = credential.signing_input()?;
    let signature = key.signing.sign(&input);

    let created = options.created.unwrap_or_else(Timestamp::now);
    let proof = suite.build_proof(
        &signature,
        key.verification_method.clone(),
        options.proof_purpose,
        created,
    );

    tracing::debug!(
        verification_method = %key.verification_method,
        proof_type = %options.proof_type,
        "credential signed"
    );

    let mut signed = credential.clone();
    signed.proof.push(proof);
    Ok(signed)
}
