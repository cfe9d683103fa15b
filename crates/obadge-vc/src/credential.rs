//! # Credential Document Model
//!
//! The typed `OpenBadgeCredential` envelope. The envelope structure is
//! rigid (`deny_unknown_fields`), while the achievement subject stays
//! extensible: `criteria` and similar fields are open JSON per the Open
//! Badges specification.
//!
//! Two subject shapes share the envelope: the achievement subject of an
//! issued badge, and the `StatusList2021` subject of a status-list
//! credential. Serde untagged dispatch keeps this a closed set — there is
//! no loosely-typed document threaded through the pipeline.
//!
//! A document is immutable once signed; the `credentialStatus` index
//! assignment must happen before signing.

use serde::{Deserialize, Serialize};

use obadge_core::{CanonicalBytes, CanonicalizationError, Timestamp};

use crate::proof::Proof;

/// W3C Verifiable Credentials base context. Must be first in `@context`.
pub const CONTEXT_CREDENTIALS_V1: &str = "https://www.w3.org/2018/credentials/v1";

/// Open Badges 3.0 context.
pub const CONTEXT_OPEN_BADGES_V3: &str =
    "https://purl.imsglobal.org/spec/ob/v3p0/context-3.0.3.json";

/// Required entry in every credential's `type` array.
pub const TYPE_VERIFIABLE_CREDENTIAL: &str = "VerifiableCredential";

/// Required entry in a badge credential's `type` array.
pub const TYPE_OPEN_BADGE_CREDENTIAL: &str = "OpenBadgeCredential";

/// `type` of a status-list credential.
pub const TYPE_STATUS_LIST_CREDENTIAL: &str = "StatusList2021Credential";

/// JSON-LD context for Status List 2021 terms.
pub const CONTEXT_STATUS_LIST_2021: &str = "https://w3id.org/vc/status-list/2021/v1";

/// An Open Badges 3.0 credential document.
///
/// Created by the issuance flow, signed once, thereafter read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenBadgeCredential {
    /// JSON-LD context URIs, ordered. The VC base context comes first.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Credential identifier (URN or URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Credential types. Must include `VerifiableCredential`; badge
    /// credentials additionally include `OpenBadgeCredential`.
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,

    /// The issuing profile.
    pub issuer: IssuerProfile,

    /// When the credential was issued.
    #[serde(rename = "issuanceDate")]
    pub issuance_date: Timestamp,

    /// Optional expiration.
    #[serde(
        rename = "expirationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<Timestamp>,

    /// The credential subject.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: CredentialSubject,

    /// Status List 2021 entry, attached before signing when the issuer
    /// tracks revocation for this credential.
    #[serde(
        rename = "credentialStatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub credential_status: Option<StatusListEntry>,

    /// Cryptographic proofs. Absent until signing.
    #[serde(default, skip_serializing_if = "ProofValue::is_empty")]
    pub proof: ProofValue,
}

/// The issuer profile embedded in a credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuerProfile {
    /// The issuer's DID (did:key).
    pub id: String,
    /// Profile type, conventionally `"Profile"`.
    #[serde(rename = "type")]
    pub profile_type: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl IssuerProfile {
    /// A `Profile`-typed issuer for a controller DID.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            profile_type: "Profile".to_string(),
            name: Some(name.into()),
        }
    }
}

/// The subject of a credential — either an achievement award or a
/// status-list bitstring. Untagged: the field shapes are disjoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CredentialSubject {
    /// A badge awarded to a recipient.
    Achievement(AchievementSubject),
    /// The compressed revocation/suspension bitstring of a status list.
    StatusList(StatusListSubject),
}

impl CredentialSubject {
    /// The achievement subject, if this is a badge credential.
    pub fn as_achievement(&self) -> Option<&AchievementSubject> {
        match self {
            CredentialSubject::Achievement(a) => Some(a),
            CredentialSubject::StatusList(_) => None,
        }
    }

    /// The status-list subject, if this is a status-list credential.
    pub fn as_status_list(&self) -> Option<&StatusListSubject> {
        match self {
            CredentialSubject::StatusList(s) => Some(s),
            CredentialSubject::Achievement(_) => None,
        }
    }
}

/// A recipient plus the achievement they earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementSubject {
    /// Recipient identifier (DID, email URI, or opaque id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Subject types, conventionally `["AchievementSubject"]`.
    #[serde(rename = "type", default, skip_serializing_if = "Vec::is_empty")]
    pub subject_type: Vec<String>,
    /// The achievement definition.
    pub achievement: Achievement,
}

/// An achievement definition.
///
/// `criteria` is intentionally open JSON: issuers attach narratives,
/// rubric links, or structured criteria per the Open Badges spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    /// Achievement identifier (URL or URN).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Types, must include `"Achievement"`.
    #[serde(rename = "type")]
    pub achievement_type: Vec<String>,
    /// Human-readable achievement name.
    pub name: String,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// What the recipient did to earn this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<serde_json::Value>,
}

/// The subject of a status-list credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusListSubject {
    /// Subject identifier, conventionally the list URL plus `#list`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Always `"StatusList2021"`.
    #[serde(rename = "type")]
    pub subject_type: String,
    /// What a set bit means for credentials on this list.
    #[serde(rename = "statusPurpose")]
    pub status_purpose: StatusPurpose,
    /// Base64-encoded bitstring.
    #[serde(rename = "encodedList")]
    pub encoded_list: String,
}

/// A `StatusList2021Entry` embedded in an issued credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusListEntry {
    /// Entry identifier, conventionally the list URL plus a fragment.
    pub id: String,
    /// Always `"StatusList2021Entry"`.
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Which list semantics apply.
    #[serde(rename = "statusPurpose")]
    pub status_purpose: StatusPurpose,
    /// The credential's bit position, serialized as a decimal string per
    /// the Status List 2021 wire format.
    #[serde(rename = "statusListIndex")]
    pub status_list_index: String,
    /// URL of the signed status-list credential.
    #[serde(rename = "statusListCredential")]
    pub status_list_credential: String,
}

impl StatusListEntry {
    /// Parse the wire-format index string.
    pub fn index(&self) -> Result<u64, String> {
        self.status_list_index
            .parse::<u64>()
            .map_err(|e| format!("invalid statusListIndex {:?}: {e}", self.status_list_index))
    }
}

/// The meaning of a set bit on a status list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPurpose {
    /// Permanent: the 0→1 transition is one-way.
    Revocation,
    /// Reversible: bits may be cleared by an explicit un-revoke.
    Suspension,
}

impl std::fmt::Display for StatusPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusPurpose::Revocation => f.write_str("revocation"),
            StatusPurpose::Suspension => f.write_str("suspension"),
        }
    }
}

/// Proof member — single object, array, or absent. JSON emitted by other
/// stacks uses either shape; serde handles the polymorphism here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProofValue {
    /// A single proof object.
    Single(Box<Proof>),
    /// An array of proof objects.
    Array(Vec<Proof>),
}

impl Default for ProofValue {
    fn default() -> Self {
        Self::Array(Vec::new())
    }
}

impl ProofValue {
    /// Whether there are no proofs.
    pub fn is_empty(&self) -> bool {
        match self {
            ProofValue::Single(_) => false,
            ProofValue::Array(arr) => arr.is_empty(),
        }
    }

    /// Normalize to a list of proof references.
    pub fn as_list(&self) -> Vec<&Proof> {
        match self {
            ProofValue::Single(p) => vec![p.as_ref()],
            ProofValue::Array(arr) => arr.iter().collect(),
        }
    }

    /// Add a proof, converting `Single` to `Array` if needed.
    pub fn push(&mut self, proof: Proof) {
        match self {
            ProofValue::Single(existing) => {
                let prev = existing.clone();
                *self = ProofValue::Array(vec![*prev, proof]);
            }
            ProofValue::Array(arr) => arr.push(proof),
        }
    }
}

impl OpenBadgeCredential {
    /// The canonical signing input: this document, `proof` removed, JCS
    /// serialized. Signer and verifier both call this — it is the only
    /// serialization path either side uses.
    pub fn signing_input(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        let mut val = serde_json::to_value(self)?;
        if let Some(obj) = val.as_object_mut() {
            obj.remove("proof");
        }
        CanonicalBytes::from_value(val)
    }

    /// Validate the envelope against the Open Badges 3.0 / VC profile.
    ///
    /// Returns one message per violation; empty means structurally valid.
    pub fn structure_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.context.first().map(String::as_str) != Some(CONTEXT_CREDENTIALS_V1) {
            errors.push(format!(
                "@context must begin with {CONTEXT_CREDENTIALS_V1}"
            ));
        }
        if !self
            .credential_type
            .iter()
            .any(|t| t == TYPE_VERIFIABLE_CREDENTIAL)
        {
            errors.push(format!("type must include {TYPE_VERIFIABLE_CREDENTIAL}"));
        }

        match &self.credential_subject {
            CredentialSubject::Achievement(subject) => {
                if !self.context.iter().any(|c| c == CONTEXT_OPEN_BADGES_V3) {
                    errors.push(format!("@context must include {CONTEXT_OPEN_BADGES_V3}"));
                }
                if !self
                    .credential_type
                    .iter()
                    .any(|t| t == TYPE_OPEN_BADGE_CREDENTIAL)
                {
                    errors.push(format!("type must include {TYPE_OPEN_BADGE_CREDENTIAL}"));
                }
                if !subject
                    .achievement
                    .achievement_type
                    .iter()
                    .any(|t| t == "Achievement")
                {
                    errors.push("achievement type must include Achievement".to_string());
                }
            }
            CredentialSubject::StatusList(subject) => {
                if subject.subject_type != "StatusList2021" {
                    errors.push(format!(
                        "status list subject type must be StatusList2021, got {:?}",
                        subject.subject_type
                    ));
                }
            }
        }

        errors
    }
}
