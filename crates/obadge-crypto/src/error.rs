//! Structured errors for cryptographic operations.

use obadge_core::IssuerId;
use thiserror::Error;

/// Errors from key management, encoding, and signature operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key generation failed. This is an environment-level fault (the OS
    /// CSPRNG was unavailable), not a recoverable runtime condition.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// No key pair is stored for the given issuer.
    #[error("no key pair stored for {0}")]
    KeyNotFound(IssuerId),

    /// A multibase string was malformed (missing `z` prefix, invalid
    /// base58, or wrong decoded length).
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Key bytes did not form a valid Ed25519 key.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Ed25519 signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// The key store collaborator failed.
    #[error("key store error: {0}")]
    Store(String),
}
