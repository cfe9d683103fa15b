//! # Ed25519 Signing and Verification
//!
//! Key pairs, public keys, and signatures for credential proofs.
//!
//! ## Security Invariant
//!
//! - Signing input MUST be `&CanonicalBytes` — you cannot sign raw bytes.
//!   The signer and the verifier are thereby forced through the same
//!   canonicalization pipeline.
//! - `Ed25519KeyPair` does not implement `Serialize`, and its `Debug`
//!   output redacts the private half. Persistence goes through the
//!   multibase-encoded [`StoredKeyPair`](crate::keys::StoredKeyPair) form.
//!
//! ## Serde
//!
//! Public keys and signatures serialize as multibase (`z` + base58btc)
//! strings, the encoding the rest of the stack speaks.

use ed25519_dalek::{Signer, Verifier};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use obadge_core::CanonicalBytes;

use crate::error::CryptoError;
use crate::multibase;

/// An Ed25519 public key (32 raw bytes).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey(pub [u8; 32]);

/// An Ed25519 signature (64 raw bytes).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ed25519Signature(pub [u8; 64]);

/// An Ed25519 key pair for signing operations.
///
/// Does not implement `Serialize` — private keys must not leak into logs,
/// responses, or artifacts.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

// ---------------------------------------------------------------------------
// Ed25519PublicKey
// ---------------------------------------------------------------------------

impl Ed25519PublicKey {
    /// Create a public key from raw 32 bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw 32-byte public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as a multibase (`z` + base58btc) string.
    pub fn to_multibase(&self) -> String {
        multibase::encode(&self.0)
    }

    /// Parse from a multibase string.
    pub fn from_multibase(s: &str) -> Result<Self, CryptoError> {
        Ok(Self(multibase::decode_exact::<32>(s)?))
    }

    /// Convert to an `ed25519_dalek::VerifyingKey`.
    pub fn to_verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey, CryptoError> {
        ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid public key: {e}")))
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_multibase())
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_multibase(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mb = self.to_multibase();
        write!(f, "Ed25519PublicKey({}...)", &mb[..mb.len().min(9)])
    }
}

impl std::fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_multibase())
    }
}

// ---------------------------------------------------------------------------
// Ed25519Signature
// ---------------------------------------------------------------------------

impl Ed25519Signature {
    /// Create a signature from raw 64 bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// The raw 64-byte signature.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Render as a multibase (`z` + base58btc) string.
    pub fn to_multibase(&self) -> String {
        multibase::encode(&self.0)
    }

    /// Parse from a multibase string.
    pub fn from_multibase(s: &str) -> Result<Self, CryptoError> {
        Ok(Self(multibase::decode_exact::<64>(s)?))
    }
}

impl Serialize for Ed25519Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_multibase())
    }
}

impl<'de> Deserialize<'de> for Ed25519Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_multibase(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mb = self.to_multibase();
        write!(f, "Ed25519Signature({}...)", &mb[..mb.len().min(9)])
    }
}

// ---------------------------------------------------------------------------
// Ed25519KeyPair
// ---------------------------------------------------------------------------

impl Ed25519KeyPair {
    /// Generate a new random key pair from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyGeneration`] only if the CSPRNG is
    /// unavailable — an environment fault, not a runtime condition.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut seed = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| CryptoError::KeyGeneration(format!("OS CSPRNG unavailable: {e}")))?;
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&seed);
        seed.zeroize();
        Ok(Self { signing_key })
    }

    /// Create a key pair from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// The public half of this key pair.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// The raw 32-byte private seed. Callers encoding key material for
    /// storage must zeroize their copy when done.
    pub fn seed_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Sign canonical bytes.
    ///
    /// The parameter type is the whole point: only `CanonicalBytes` can be
    /// signed, so non-canonical serializations never reach the signer.
    pub fn sign(&self, data: &CanonicalBytes) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(data.as_bytes()).to_bytes())
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519KeyPair(<private>)")
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify an Ed25519 signature over canonical bytes.
///
/// Returns `Ok(())` for a valid signature, otherwise
/// [`CryptoError::VerificationFailed`]. Any byte-level difference in the
/// canonical input fails deterministically.
pub fn verify(
    data: &CanonicalBytes,
    signature: &Ed25519Signature,
    verifying_key: &ed25519_dalek::VerifyingKey,
) -> Result<(), CryptoError> {
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key
        .verify(data.as_bytes(), &sig)
        .map_err(|e| CryptoError::VerificationFailed(format!("Ed25519: {e}")))
}

/// Verification using an [`Ed25519PublicKey`] instead of a dalek key.
pub fn verify_with_public_key(
    data: &CanonicalBytes,
    signature: &Ed25519Signature,
    public_key: &Ed25519PublicKey,
) -> Result<(), CryptoError> {
    let vk = public_key.to_verifying_key()?;
    verify(data, signature, &vk)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(v: serde_json::Value) -> CanonicalBytes {
        CanonicalBytes::new(&v).expect("canonicalize")
    }

    #[test]
    fn sign_and_verify() {
        let kp = Ed25519KeyPair::generate().unwrap();
        let data = canonical(serde_json::json!({"issuer": "did:key:zTest", "n": 1}));
        let sig = kp.sign(&data);
        verify_with_public_key(&data, &sig, &kp.public_key()).expect("valid signature");
    }

    #[test]
    fn wrong_key_fails() {
        let kp1 = Ed25519KeyPair::generate().unwrap();
        let kp2 = Ed25519KeyPair::generate().unwrap();
        let data = canonical(serde_json::json!({"x": true}));
        let sig = kp1.sign(&data);
        assert!(verify_with_public_key(&data, &sig, &kp2.public_key()).is_err());
    }

    #[test]
    fn tampered_message_fails() {
        let kp = Ed25519KeyPair::generate().unwrap();
        let original = canonical(serde_json::json!({"name": "Rust Badge"}));
        let tampered = canonical(serde_json::json!({"name": "Go Badge"}));
        let sig = kp.sign(&original);
        assert!(verify_with_public_key(&tampered, &sig, &kp.public_key()).is_err());
    }

    #[test]
    fn deterministic_from_seed() {
        let seed = [42u8; 32];
        let kp1 = Ed25519KeyPair::from_seed(&seed);
        let kp2 = Ed25519KeyPair::from_seed(&seed);
        assert_eq!(kp1.public_key(), kp2.public_key());

        let data = canonical(serde_json::json!({"d": 1}));
        assert_eq!(kp1.sign(&data), kp2.sign(&data));
    }

    #[test]
    fn public_key_multibase_roundtrip() {
        let kp = Ed25519KeyPair::generate().unwrap();
        let pk = kp.public_key();
        let mb = pk.to_multibase();
        assert!(mb.starts_with('z'));
        assert_eq!(Ed25519PublicKey::from_multibase(&mb).unwrap(), pk);
    }

    #[test]
    fn signature_multibase_roundtrip() {
        let kp = Ed25519KeyPair::generate().unwrap();
        let sig = kp.sign(&canonical(serde_json::json!({"y": 2})));
        let mb = sig.to_multibase();
        assert_eq!(Ed25519Signature::from_multibase(&mb).unwrap(), sig);
    }

    #[test]
    fn public_key_serde_is_multibase_string() {
        let kp = Ed25519KeyPair::generate().unwrap();
        let pk = kp.public_key();
        let json = serde_json::to_string(&pk).unwrap();
        assert!(json.starts_with("\"z"));
        let back: Ed25519PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pk);
    }

    #[test]
    fn public_key_rejects_wrong_length() {
        let short = multibase::encode(&[1u8; 16]);
        assert!(Ed25519PublicKey::from_multibase(&short).is_err());
    }

    #[test]
    fn debug_does_not_leak_private_key() {
        let kp = Ed25519KeyPair::generate().unwrap();
        assert_eq!(format!("{kp:?}"), "Ed25519KeyPair(<private>)");
    }

    #[test]
    fn debug_public_key_truncates() {
        let kp = Ed25519KeyPair::generate().unwrap();
        let debug = format!("{:?}", kp.public_key());
        assert!(debug.starts_with("Ed25519PublicKey(z"));
        assert!(debug.ends_with("...)"));
    }
}
