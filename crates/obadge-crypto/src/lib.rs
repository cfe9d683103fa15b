//! # obadge-crypto — Cryptographic Primitives
//!
//! The cryptographic building blocks of the Open Badge stack:
//!
//! - **Ed25519** signing and verification. Signing input is
//!   `&CanonicalBytes` only — you cannot sign raw bytes, so signer and
//!   verifier are forced through the same canonicalization pipeline.
//! - **Multibase** encoding (`z` + base58btc) for key material at rest.
//! - **did:key** derivation: multicodec-prefixed public key, multibase
//!   encoded. The controller identifier is a pure function of the public
//!   key, never independently chosen.
//! - **KeyManager** over a [`KeyStore`] collaborator: generates, encodes,
//!   and retrieves per-issuer key pairs.
//!
//! ## Crate Policy
//!
//! - Depends only on `obadge-core` internally.
//! - No mocking of cryptographic operations in tests — all tests use real
//!   `CanonicalBytes`, real Ed25519.
//! - Private key material is never serialized in raw form and never
//!   printed by `Debug`.

pub mod didkey;
pub mod ed25519;
pub mod error;
pub mod keys;
pub mod multibase;

pub use didkey::{
    controller_of, did_key_from_public, public_key_from_did_key, verification_method_id,
};
pub use ed25519::{verify, verify_with_public_key, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use error::CryptoError;
pub use keys::{InMemoryKeyStore, KeyManager, KeyPair, KeyStore, StoredKeyPair};
