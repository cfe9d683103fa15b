//! # Multibase Encoding
//!
//! The stack stores key material and `DataIntegrityProof` signature values
//! as multibase strings: a `z` prefix followed by the base58btc encoding of
//! the raw bytes. Decoding rejects any string that does not carry the `z`
//! prefix — there is no fallback to other bases.

use crate::error::CryptoError;

/// Multibase prefix for base58btc.
pub const BASE58BTC_PREFIX: char = 'z';

/// Encode raw bytes as a `z`-prefixed base58btc string.
pub fn encode(bytes: &[u8]) -> String {
    format!("{BASE58BTC_PREFIX}{}", bs58::encode(bytes).into_string())
}

/// Decode a `z`-prefixed base58btc string to raw bytes.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedEncoding`] if the string is empty, does
/// not start with `z`, or contains invalid base58 characters.
pub fn decode(s: &str) -> Result<Vec<u8>, CryptoError> {
    let rest = s.strip_prefix(BASE58BTC_PREFIX).ok_or_else(|| {
        CryptoError::MalformedEncoding(format!(
            "multibase string must start with '{BASE58BTC_PREFIX}', got: {:?}",
            s.chars().next()
        ))
    })?;
    bs58::decode(rest)
        .into_vec()
        .map_err(|e| CryptoError::MalformedEncoding(format!("invalid base58: {e}")))
}

/// Decode a multibase string into a fixed-size array.
///
/// Used for 32-byte keys and 64-byte signatures, where length is part of
/// the contract.
pub fn decode_exact<const N: usize>(s: &str) -> Result<[u8; N], CryptoError> {
    let bytes = decode(s)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        CryptoError::MalformedEncoding(format!("expected {N} decoded bytes, got {len}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let bytes = [7u8; 32];
        let encoded = encode(&bytes);
        assert!(encoded.starts_with('z'));
        assert_eq!(decode(&encoded).unwrap(), bytes);
    }

    #[test]
    fn rejects_missing_prefix() {
        let without_z = bs58::encode([1u8; 32]).into_string();
        assert!(decode(&without_z).is_err());
    }

    #[test]
    fn rejects_empty() {
        assert!(decode("").is_err());
    }

    #[test]
    fn rejects_invalid_base58() {
        // '0', 'O', 'I', 'l' are not in the base58 alphabet.
        assert!(decode("z0OIl").is_err());
    }

    #[test]
    fn decode_exact_checks_length() {
        let encoded = encode(&[9u8; 16]);
        assert!(decode_exact::<32>(&encoded).is_err());
        assert_eq!(decode_exact::<16>(&encoded).unwrap(), [9u8; 16]);
    }

    #[test]
    fn output_is_base58_alphabet() {
        let encoded = encode(&[0xAB; 32]);
        assert!(encoded[1..].chars().all(|c| {
            matches!(c, '1'..='9' | 'A'..='H' | 'J'..='N' | 'P'..='Z' | 'a'..='k' | 'm'..='z')
        }));
    }
}
