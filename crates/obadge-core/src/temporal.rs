//! # Temporal Types — UTC-Only Timestamps
//!
//! `Timestamp` enforces what canonicalization needs from dates: UTC with Z
//! suffix, truncated to seconds. `issuanceDate`, `expirationDate`, and a
//! proof's `created` field all use it, so two serializations of the same
//! instant can never differ by timezone representation or sub-second noise.
//!
//! Strict parsing ([`Timestamp::parse()`]) rejects non-Z offsets outright —
//! even `+00:00`, which is semantically UTC but canonicalizes differently.
//! [`Timestamp::parse_lenient()`] exists for ingesting third-party
//! credentials and converts any offset to UTC.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// Serializes as `YYYY-MM-DDTHH:MM:SSZ` — no sub-seconds, no `+00:00`,
/// always `Z`. Deserialization goes through [`Timestamp::parse_lenient()`]
/// so ingested documents are normalized the same way: offsets convert to
/// UTC, sub-seconds truncate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(0))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(0))
    }

    /// Strict parse: RFC 3339 with a literal `Z` suffix.
    ///
    /// # Errors
    ///
    /// Rejects invalid RFC 3339 and any explicit offset (`+05:30`,
    /// `-04:00`, even `+00:00`).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !s.ends_with('Z') {
            return Err(CoreError::Validation(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| CoreError::Validation(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;
        Ok(Self(dt.with_timezone(&Utc).trunc_subsecs(0)))
    }

    /// Lenient parse: any RFC 3339 offset, converted to UTC.
    ///
    /// For signing paths prefer [`Timestamp::parse()`].
    pub fn parse_lenient(s: &str) -> Result<Self, CoreError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| CoreError::Validation(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;
        Ok(Self(dt.with_timezone(&Utc).trunc_subsecs(0)))
    }

    /// Render as Z-suffixed ISO 8601 at second precision.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Whether this instant is strictly in the past.
    pub fn is_past(&self) -> bool {
        self.0 < Utc::now()
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse_lenient(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}
