//! # did:key Derivation and Resolution
//!
//! A `did:key` identifier is self-certifying: it is the multibase encoding
//! of the multicodec-prefixed public key, so the controller DID is a pure
//! function of the key bytes. There is no registry and no resolution
//! protocol — parsing the DID back yields the key.
//!
//! Format for Ed25519:
//!
//! ```text
//! did:key:z6Mk...   = "did:key:" + multibase(0xED 0x01 ∥ public_key)
//! ```
//!
//! The verification method referenced by proofs is always the controller
//! DID plus the `#key-1` fragment.

use crate::ed25519::Ed25519PublicKey;
use crate::error::CryptoError;
use crate::multibase;

/// Multicodec prefix for an Ed25519 public key (varint 0xED), per the
/// did:key method specification.
pub const MULTICODEC_ED25519_PUB: [u8; 2] = [0xED, 0x01];

/// DID method prefix.
const DID_KEY_PREFIX: &str = "did:key:";

/// Fragment appended to the controller DID to name the signing key.
pub const KEY_FRAGMENT: &str = "#key-1";

/// Derive the `did:key` controller identifier for a public key.
pub fn did_key_from_public(public_key: &Ed25519PublicKey) -> String {
    let mut prefixed = Vec::with_capacity(2 + 32);
    prefixed.extend_from_slice(&MULTICODEC_ED25519_PUB);
    prefixed.extend_from_slice(public_key.as_bytes());
    format!("{DID_KEY_PREFIX}{}", multibase::encode(&prefixed))
}

/// The verification method identifier for a controller DID.
///
/// Invariant: always `controller + "#key-1"`.
pub fn verification_method_id(controller: &str) -> String {
    format!("{controller}{KEY_FRAGMENT}")
}

/// The controller portion of a verification method (everything before the
/// `#` fragment, or the whole string if there is none).
pub fn controller_of(verification_method: &str) -> &str {
    verification_method
        .split_once('#')
        .map(|(c, _)| c)
        .unwrap_or(verification_method)
}

/// Resolve a `did:key` (or did:key-based verification method) back to the
/// raw Ed25519 public key.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedEncoding`] if the string is not a
/// `did:key`, the multibase payload is invalid, the multicodec prefix is
/// not Ed25519, or the key is not 32 bytes.
pub fn public_key_from_did_key(did: &str) -> Result<Ed25519PublicKey, CryptoError> {
    let controller = controller_of(did);
    let encoded = controller.strip_prefix(DID_KEY_PREFIX).ok_or_else(|| {
        CryptoError::MalformedEncoding(format!("not a did:key identifier: {controller}"))
    })?;
    let decoded = multibase::decode(encoded)?;
    let key = decoded
        .strip_prefix(&MULTICODEC_ED25519_PUB[..])
        .ok_or_else(|| {
            CryptoError::MalformedEncoding(
                "did:key payload does not carry the Ed25519 multicodec prefix".to_string(),
            )
        })?;
    let bytes: [u8; 32] = key.try_into().map_err(|_| {
        CryptoError::MalformedEncoding(format!(
            "did:key payload must decode to 32 key bytes, got {}",
            decoded.len().saturating_sub(2)
        ))
    })?;
    Ok(Ed25519PublicKey::from_bytes(bytes))
}
