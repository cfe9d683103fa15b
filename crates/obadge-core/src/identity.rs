//! # Identifier Newtypes
//!
//! Newtype wrappers for the identifiers flowing through the proof
//! subsystem. You cannot pass a `CredentialId` where a `StatusListId` is
//! expected — index allocation and revocation lookups are keyed by the
//! right namespace at compile time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an issuing organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuerId(pub Uuid);

/// Unique identifier for an issued credential (assertion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialId(pub Uuid);

/// Unique identifier for a revocation/suspension status list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusListId(pub Uuid);

impl IssuerId {
    /// Generate a new random issuer identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl CredentialId {
    /// Generate a new random credential identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl StatusListId {
    /// Generate a new random status list identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for IssuerId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for CredentialId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for StatusListId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for IssuerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "issuer:{}", self.0)
    }
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "credential:{}", self.0)
    }
}

impl std::fmt::Display for StatusListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "status-list:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(CredentialId::new(), CredentialId::new());
        assert_ne!(IssuerId::new(), IssuerId::new());
    }

    #[test]
    fn display_carries_namespace() {
        let id = StatusListId::new();
        assert!(format!("{id}").starts_with("status-list:"));
    }

    #[test]
    fn serde_roundtrip() {
        let id = CredentialId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: CredentialId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
