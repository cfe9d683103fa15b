//! # Issuer Key Management
//!
//! [`KeyManager`] generates, encodes, and retrieves per-issuer Ed25519 key
//! pairs. It is a pure transformation layer over raw bytes ↔ multibase
//! forms plus CSPRNG generation; persistence is the [`KeyStore`]
//! collaborator's concern.
//!
//! ## Encoding Contract
//!
//! Keys rest as multibase strings (`z` + base58btc of the raw 32 bytes).
//! The controller DID is derived from the public key via the Ed25519
//! multicodec prefix — never independently chosen — and the verification
//! method identifier is always `controller + "#key-1"`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use obadge_core::IssuerId;

use crate::didkey;
use crate::ed25519::{Ed25519KeyPair, Ed25519PublicKey};
use crate::error::CryptoError;
use crate::multibase;

/// A decoded, ready-to-sign issuer key pair.
///
/// Created once per issuer (or per rotation event), read by signer and
/// verifier, never mutated.
#[derive(Debug)]
pub struct KeyPair {
    /// The issuer this pair belongs to.
    pub issuer_id: IssuerId,
    /// The did:key controller derived from the public key.
    pub controller: String,
    /// The verification method identifier (`controller + "#key-1"`).
    pub verification_method: String,
    /// The public half.
    pub public_key: Ed25519PublicKey,
    /// The signing half. `Debug` redacts it; there is no `Serialize`.
    pub signing: Ed25519KeyPair,
}

impl KeyPair {
    /// Encode this pair into its at-rest form.
    pub fn to_stored(&self) -> StoredKeyPair {
        let mut seed = self.signing.seed_bytes();
        let private_key_multibase = multibase::encode(&seed);
        seed.zeroize();
        StoredKeyPair {
            issuer_id: self.issuer_id,
            controller: self.controller.clone(),
            verification_method: self.verification_method.clone(),
            public_key_multibase: self.public_key.to_multibase(),
            private_key_multibase,
        }
    }
}

/// The multibase-encoded, at-rest form of an issuer key pair.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredKeyPair {
    /// The issuer this pair belongs to.
    pub issuer_id: IssuerId,
    /// The did:key controller.
    pub controller: String,
    /// The verification method identifier.
    pub verification_method: String,
    /// Multibase-encoded public key (`z` + base58 of 32 bytes).
    pub public_key_multibase: String,
    /// Multibase-encoded private seed (`z` + base58 of 32 bytes).
    pub private_key_multibase: String,
}

impl std::fmt::Debug for StoredKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredKeyPair")
            .field("issuer_id", &self.issuer_id)
            .field("controller", &self.controller)
            .field("verification_method", &self.verification_method)
            .field("public_key_multibase", &self.public_key_multibase)
            .field("private_key_multibase", &"<private>")
            .finish()
    }
}

impl StoredKeyPair {
    /// Decode back to a usable [`KeyPair`].
    ///
    /// Rejects non-`z` encodings and verifies that the stored public key
    /// matches the one derived from the private seed, so a corrupted or
    /// mismatched record cannot silently sign with the wrong identity.
    pub fn decode(&self) -> Result<KeyPair, CryptoError> {
        let mut seed = multibase::decode_exact::<32>(&self.private_key_multibase)?;
        let signing = Ed25519KeyPair::from_seed(&seed);
        seed.zeroize();

        let stored_public = Ed25519PublicKey::from_multibase(&self.public_key_multibase)?;
        let derived_public = signing.public_key();
        if stored_public != derived_public {
            return Err(CryptoError::InvalidKey(format!(
                "stored public key does not match private seed for {}",
                self.issuer_id
            )));
        }

        Ok(KeyPair {
            issuer_id: self.issuer_id,
            controller: self.controller.clone(),
            verification_method: self.verification_method.clone(),
            public_key: derived_public,
            signing,
        })
    }
}

/// Persistence boundary for issuer key pairs.
///
/// Implementations must be `Send + Sync`. Timeout and retry policy for
/// remote stores lives behind this trait, not in the KeyManager.
pub trait KeyStore: Send + Sync {
    /// Store (or replace) the pair for its issuer.
    fn put_key(&self, pair: StoredKeyPair) -> Result<(), CryptoError>;

    /// Fetch the stored pair for an issuer, if any.
    fn get_key(&self, issuer_id: IssuerId) -> Result<Option<StoredKeyPair>, CryptoError>;
}

/// In-memory key store for development and testing.
#[derive(Default)]
pub struct InMemoryKeyStore {
    keys: RwLock<HashMap<IssuerId, StoredKeyPair>>,
}

impl InMemoryKeyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for InMemoryKeyStore {
    fn put_key(&self, pair: StoredKeyPair) -> Result<(), CryptoError> {
        self.keys.write().insert(pair.issuer_id, pair);
        Ok(())
    }

    fn get_key(&self, issuer_id: IssuerId) -> Result<Option<StoredKeyPair>, CryptoError> {
        Ok(self.keys.read().get(&issuer_id).cloned())
    }
}

/// Generates and retrieves issuer key pairs over a [`KeyStore`].
pub struct KeyManager {
    store: Arc<dyn KeyStore>,
}

impl KeyManager {
    /// Create a manager over the given store.
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self { store }
    }

    /// Generate a fresh Ed25519 pair for an issuer, derive its controller
    /// DID and verification method, and persist the encoded form.
    ///
    /// # Errors
    ///
    /// [`CryptoError::KeyGeneration`] if the OS CSPRNG is unavailable;
    /// store failures propagate as [`CryptoError::Store`].
    pub fn generate_key(&self, issuer_id: IssuerId) -> Result<KeyPair, CryptoError> {
        let signing = Ed25519KeyPair::generate()?;
        let public_key = signing.public_key();
        let controller = didkey::did_key_from_public(&public_key);
        let verification_method = didkey::verification_method_id(&controller);

        let pair = KeyPair {
            issuer_id,
            controller,
            verification_method,
            public_key,
            signing,
        };
        self.store.put_key(pair.to_stored())?;
        tracing::debug!(issuer = %issuer_id, controller = %pair.controller, "generated issuer key pair");
        Ok(pair)
    }

    /// Retrieve and decode the stored pair for an issuer.
    ///
    /// # Errors
    ///
    /// [`CryptoError::KeyNotFound`] if no pair is stored;
    /// [`CryptoError::MalformedEncoding`] / [`CryptoError::InvalidKey`] if
    /// the stored record cannot be decoded.
    pub fn get_key(&self, issuer_id: IssuerId) -> Result<KeyPair, CryptoError> {
        let stored = self
            .store
            .get_key(issuer_id)?
            .ok_or(CryptoError::KeyNotFound(issuer_id))?;
        stored.decode()
    }

    /// Retrieve only the public key for an issuer (verification path).
    pub fn get_public_key(&self, issuer_id: IssuerId) -> Result<Ed25519PublicKey, CryptoError> {
        let stored = self
            .store
            .get_key(issuer_id)?
            .ok_or(CryptoError::KeyNotFound(issuer_id))?;
        Ed25519PublicKey::from_multibase(&stored.public_key_multibase)
    }
}
