//! # Canonical Serialization — JCS-Compatible Byte Production
//!
//! Defines `CanonicalBytes`, the sole construction path for the bytes a
//! credential proof is computed over.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()` (or `from_value()`),
//! which validates the value tree (float rejection) before RFC 8785 (JCS)
//! serialization via `serde_jcs`.
//!
//! This makes the "signer and verifier serialized differently" defect class
//! structurally impossible: the signer's input and the verifier's recomputed
//! input both flow through this constructor, so a signature mismatch can
//! only mean the document changed or the key is wrong — never that two
//! equally-valid serializations disagreed.
//!
//! ## Rules
//!
//! 1. **Reject floats.** Credential fields carrying numbers (credit values,
//!    status list indices) must be integers or strings.
//! 2. **Sorted keys, compact separators.** `serde_jcs` emits RFC 8785
//!    output: lexicographically sorted object keys, no whitespace.
//! 3. **UTF-8 passthrough.** Non-ASCII text (badge names, criteria) is not
//!    escaped; the canonical bytes are the UTF-8 encoding of the JCS string.
//!
//! Datetime normalization happens before this layer: `Timestamp` only
//! serializes as Z-suffixed second-precision ISO 8601.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructors are [`CanonicalBytes::new()`] and
///   [`CanonicalBytes::from_value()`].
/// - No value in the tree is a float.
/// - Object keys are sorted, separators compact (RFC 8785).
///
/// The inner `Vec<u8>` is private; downstream code cannot fabricate a
/// `CanonicalBytes` from arbitrary bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::FloatRejected`] if the value tree
    /// contains a float, or [`CanonicalizationError::SerializationFailed`]
    /// if JCS serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(value)
    }

    /// Canonicalize an already-built JSON value.
    ///
    /// Used by the signing path, which needs to strip the `proof` member
    /// from the value tree before canonicalizing.
    pub fn from_value(value: Value) -> Result<Self, CanonicalizationError> {
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for signing or verification.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Walk the value tree and reject any float that is not representable as
/// an integer. Integer-valued `i64`/`u64` numbers pass through.
fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(arr) => arr.iter().try_for_each(reject_floats),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// JSON values without floats — the domain of valid signing input.
    fn json_value_no_floats() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ @:/#.-]{0,40}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::btree_map("[a-zA-Z@]{1,12}", inner, 0..8).prop_map(|m| {
                    Value::Object(m.into_iter().collect())
                }),
            ]
        })
    }

    proptest! {
        /// Canonicalization never fails for float-free values.
        #[test]
        fn never_fails_without_floats(value in json_value_no_floats()) {
            prop_assert!(CanonicalBytes::new(&value).is_ok());
        }

        /// Deterministic: identical input, identical bytes. This is the
        /// property the whole proof subsystem rests on.
        #[test]
        fn deterministic(value in json_value_no_floats()) {
            let a = CanonicalBytes::new(&value).unwrap();
            let b = CanonicalBytes::new(&value).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }

        /// Output parses back to JSON with lexicographically sorted keys.
        #[test]
        fn keys_sorted(keys in prop::collection::btree_set("[a-z]{1,8}", 2..6)) {
            let map: serde_json::Map<String, Value> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| (k.clone(), serde_json::json!(i)))
                .collect();
            let cb = CanonicalBytes::new(&Value::Object(map)).unwrap();
            let parsed: serde_json::Map<String, Value> =
                serde_json::from_slice(cb.as_bytes()).unwrap();
            let out: Vec<&String> = parsed.keys().collect();
            let mut sorted = out.clone();
            sorted.sort();
            prop_assert_eq!(out, sorted);
        }

        /// Any non-integer float anywhere in the tree is rejected.
        #[test]
        fn floats_always_rejected(f in any::<f64>().prop_filter("non-integer", |f| {
            f.fract() != 0.0 && f.is_finite()
        })) {
            let data = serde_json::json!({"v": f});
            prop_assert!(CanonicalBytes::new(&data).is_err());
        }
    }
}
