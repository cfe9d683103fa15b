//! # Proof Types and the Suite Registry
//!
//! The [`Proof`] object attached to a credential, and the [`ProofSuite`]
//! trait with one implementation per supported suite:
//!
//! - **DataIntegrityProof / eddsa-rdfc-2022** — canonical. Signature bytes
//!   in `proofValue`, multibase (`z` + base58btc) encoded.
//! - **Ed25519Signature2020** — legacy, consumed for backward
//!   compatibility. Signature carried as a detached JWS in `jws`.
//! - **JsonWebSignature2020** — legacy, detached JWS in `jws`.
//!
//! Suite selection goes through [`suite_for`]; signer and verifier never
//! branch on type strings themselves.
//!
//! All suites sign the same input (the JCS-canonical document without
//! `proof`) with Ed25519 — they differ only in how the signature bytes are
//! carried on the wire.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use obadge_core::Timestamp;
use obadge_crypto::Ed25519Signature;

/// The cryptosuite identifier required on `DataIntegrityProof` proofs.
pub const CRYPTOSUITE_EDDSA_RDFC_2022: &str = "eddsa-rdfc-2022";

/// The type of cryptographic proof attached to a credential.
///
/// Unknown types deserialize as [`ProofType::Other`] so a document carrying
/// an unsupported suite still parses — the verifier reports
/// `UnsupportedProofType` as a check failure, not a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProofType {
    /// W3C Data Integrity proof; cryptosuite names the algorithm.
    DataIntegrityProof,
    /// Legacy Ed25519 suite carrying a detached JWS.
    Ed25519Signature2020,
    /// Legacy JWS suite.
    JsonWebSignature2020,
    /// Any proof type this stack does not implement.
    Other(String),
}

impl ProofType {
    /// The wire-format type string.
    pub fn as_str(&self) -> &str {
        match self {
            ProofType::DataIntegrityProof => "DataIntegrityProof",
            ProofType::Ed25519Signature2020 => "Ed25519Signature2020",
            ProofType::JsonWebSignature2020 => "JsonWebSignature2020",
            ProofType::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProofType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProofType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "DataIntegrityProof" => ProofType::DataIntegrityProof,
            "Ed25519Signature2020" => ProofType::Ed25519Signature2020,
            "JsonWebSignature2020" => ProofType::JsonWebSignature2020,
            _ => ProofType::Other(s),
        })
    }
}

/// The purpose of a cryptographic proof, per the W3C proof-purpose
/// vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    /// The issuer asserts the credential claims are true.
    AssertionMethod,
    /// Authentication of the credential holder.
    Authentication,
}

impl std::fmt::Display for ProofPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofPurpose::AssertionMethod => f.write_str("assertionMethod"),
            ProofPurpose::Authentication => f.write_str("authentication"),
        }
    }
}

/// A cryptographic proof on a credential.
///
/// `proofValue` is the only field covering the signature bytes for the
/// Data Integrity suite; the legacy suites carry them in `jws` instead.
/// Exactly one of the two is populated per proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    /// The proof suite.
    #[serde(rename = "type")]
    pub proof_type: ProofType,

    /// Cryptosuite name; present on `DataIntegrityProof` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cryptosuite: Option<String>,

    /// When the proof was created.
    pub created: Timestamp,

    /// DID URL of the key that produced this proof.
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,

    /// Why the proof was attached.
    #[serde(rename = "proofPurpose")]
    pub proof_purpose: ProofPurpose,

    /// Multibase-encoded signature (Data Integrity suite).
    #[serde(rename = "proofValue", default, skip_serializing_if = "Option::is_none")]
    pub proof_value: Option<String>,

    /// Detached JWS (legacy suites).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jws: Option<String>,
}

/// Errors from suite resolution and signature extraction.
#[derive(Error, Debug)]
pub enum SuiteError {
    /// The proof type is not one of the supported suites.
    #[error("unsupported proof type: {0}")]
    UnsupportedProofType(String),

    /// A `DataIntegrityProof` named a cryptosuite other than
    /// `eddsa-rdfc-2022`.
    #[error("unsupported cryptosuite: {0}")]
    UnsupportedCryptosuite(String),

    /// The signature field was absent or undecodable.
    #[error("malformed proof encoding: {0}")]
    MalformedEncoding(String),
}

/// A proof suite: how signature bytes are carried on a [`Proof`].
///
/// One implementation per suite; resolved through [`suite_for`] at
/// verification time and [`suite_of_type`] at signing time.
pub trait ProofSuite: Send + Sync {
    /// The suite's wire-format type.
    fn proof_type(&self) -> ProofType;

    /// The cryptosuite name, for suites that carry one.
    fn cryptosuite(&self) -> Option<&'static str>;

    /// Build a proof object carrying the given signature.
    fn build_proof(
        &self,
        signature: &Ed25519Signature,
        verification_method: String,
        proof_purpose: ProofPurpose,
        created: Timestamp,
    ) -> Proof;

    /// Extract the raw signature bytes from a proof of this suite.
    fn extract_signature(&self, proof: &Proof) -> Result<Ed25519Signature, SuiteError>;
}

/// Resolve the suite for a parsed proof.
///
/// # Errors
///
/// [`SuiteError::UnsupportedProofType`] for unknown types;
/// [`SuiteError::UnsupportedCryptosuite`] when a `DataIntegrityProof`
/// names anything but `eddsa-rdfc-2022`.
pub fn suite_for(proof: &Proof) -> Result<&'static dyn ProofSuite, SuiteError> {
    match &proof.proof_type {
        ProofType::DataIntegrityProof => {
            match proof.cryptosuite.as_deref() {
                Some(CRYPTOSUITE_EDDSA_RDFC_2022) => Ok(&DataIntegritySuite),
                other => Err(SuiteError::UnsupportedCryptosuite(
                    other.unwrap_or("<missing>").to_string(),
                )),
            }
        }
        ProofType::Ed25519Signature2020 => Ok(&Ed25519Signature2020Suite),
        ProofType::JsonWebSignature2020 => Ok(&JsonWebSignature2020Suite),
        ProofType::Other(s) => Err(SuiteError::UnsupportedProofType(s.clone())),
    }
}

/// Resolve a suite by type, for signing. `Other` types are not signable.
pub fn suite_of_type(proof_type: &ProofType) -> Result<&'static dyn ProofSuite, SuiteError> {
    match proof_type {
        ProofType::DataIntegrityProof => Ok(&DataIntegritySuite),
        ProofType::Ed25519Signature2020 => Ok(&Ed25519Signature2020Suite),
        ProofType::JsonWebSignature2020 => Ok(&JsonWebSignature2020Suite),
        ProofType::Other(s) => Err(SuiteError::UnsupportedProofType(s.clone())),
    }
}

// ---------------------------------------------------------------------------
// DataIntegrityProof / eddsa-rdfc-2022
// ---------------------------------------------------------------------------

struct DataIntegritySuite;

impl ProofSuite for DataIntegritySuite {
    fn proof_type(&self) -> ProofType {
        ProofType::DataIntegrityProof
    }

    fn cryptosuite(&self) -> Option<&'static str> {
        Some(CRYPTOSUITE_EDDSA_RDFC_2022)
    }

    fn build_proof(
        &self,
        signature: &Ed25519Signature,
        verification_method: String,
        proof_purpose: ProofPurpose,
        created: Timestamp,
    ) -> Proof {
        Proof {
            proof_type: ProofType::DataIntegrityProof,
            cryptosuite: Some(CRYPTOSUITE_EDDSA_RDFC_2022.to_string()),
            created,
            verification_method,
            proof_purpose,
            proof_value: Some(signature.to_multibase()),
            jws: None,
        }
    }

    fn extract_signature(&self, proof: &Proof) -> Result<Ed25519Signature, SuiteError> {
        let value = proof
            .proof_value
            .as_deref()
            .ok_or_else(|| SuiteError::MalformedEncoding("proofValue is absent".to_string()))?;
        Ed25519Signature::from_multibase(value)
            .map_err(|e| SuiteError::MalformedEncoding(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Legacy JWS suites
// ---------------------------------------------------------------------------

/// Detached-payload JWS header for EdDSA: `{"alg":"EdDSA","b64":false,"crit":["b64"]}`.
const DETACHED_JWS_HEADER: &str = r#"{"alg":"EdDSA","b64":false,"crit":["b64"]}"#;

fn encode_detached_jws(signature: &Ed25519Signature) -> String {
    let header = URL_SAFE_NO_PAD.encode(DETACHED_JWS_HEADER.as_bytes());
    let sig = URL_SAFE_NO_PAD.encode(signature.as_bytes());
    format!("{header}..{sig}")
}

fn decode_detached_jws(jws: &str) -> Result<Ed25519Signature, SuiteError> {
    let mut parts = jws.split('.');
    let (header, payload, sig) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(p), Some(s), None) => (h, p, s),
        _ => {
            return Err(SuiteError::MalformedEncoding(
                "jws must have three dot-separated segments".to_string(),
            ))
        }
    };
    if !payload.is_empty() {
        return Err(SuiteError::MalformedEncoding(
            "jws payload must be detached (empty second segment)".to_string(),
        ));
    }
    // The header must at least be valid base64url; its contents are fixed
    // by this stack and not renegotiated per proof.
    URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| SuiteError::MalformedEncoding(format!("jws header: {e}")))?;
    let sig_bytes = URL_SAFE_NO_PAD
        .decode(sig)
        .map_err(|e| SuiteError::MalformedEncoding(format!("jws signature: {e}")))?;
    let arr: [u8; 64] = sig_bytes.try_into().map_err(|v: Vec<u8>| {
        SuiteError::MalformedEncoding(format!("jws signature must be 64 bytes, got {}", v.len()))
    })?;
    Ok(Ed25519Signature::from_bytes(arr))
}

struct Ed25519Signature2020Suite;

impl ProofSuite for Ed25519Signature2020Suite {
    fn proof_type(&self) -> ProofType {
        ProofType::Ed25519Signature2020
    }

    fn cryptosuite(&self) -> Option<&'static str> {
        None
    }

    fn build_proof(
        &self,
        signature: &Ed25519Signature,
        verification_method: String,
        proof_purpose: ProofPurpose,
        created: Timestamp,
    ) -> Proof {
        Proof {
            proof_type: ProofType::Ed25519Signature2020,
            cryptosuite: None,
            created,
            verification_method,
            proof_purpose,
            proof_value: None,
            jws: Some(encode_detached_jws(signature)),
        }
    }

    fn extract_signature(&self, proof: &Proof) -> Result<Ed25519Signature, SuiteError> {
        let jws = proof
            .jws
            .as_deref()
            .ok_or_else(|| SuiteError::MalformedEncoding("jws is absent".to_string()))?;
        decode_detached_jws(jws)
    }
}

struct JsonWebSignature2020Suite;

impl ProofSuite for JsonWebSignature2020Suite {
    fn proof_type(&self) -> ProofType {
        ProofType::JsonWebSignature2020
    }

    fn cryptosuite(&self) -> Option<&'static str> {
        None
    }

    fn build_proof(
        &self,
        signature: &Ed25519Signature,
        verification_method: String,
        proof_purpose: ProofPurpose,
        created: Timestamp,
    ) -> Proof {
        Proof {
            proof_type: ProofType::JsonWebSignature2020,
            cryptosuite: None,
            created,
            verification_method,
            proof_purpose,
            proof_value: None,
            jws: Some(encode_detached_jws(signature)),
        }
    }

    fn extract_signature(&self, proof: &Proof) -> Result<Ed25519Signature, SuiteError> {
        let jws = proof
            .jws
            .as_deref()
            .ok_or_else(|| SuiteError::MalformedEncoding("jws is absent".to_string()))?;
        decode_detached_jws(jws)
    }
}
