//! # Status List Bitstring Codec
//!
//! The Status List 2021 bitstring: one bit per issued credential, packed
//! MSB-first (bit index 0 is the most significant bit of byte 0), encoded
//! as standard base64 for the `encodedList` field.
//!
//! The codec is pure — no storage, no locking. Concurrency is handled a
//! layer up by the versioned store.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::StatusError;

/// Default list capacity in bits.
pub const DEFAULT_SIZE_BITS: usize = 16_384;

/// A fixed-size bitstring of credential status flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitstring {
    bytes: Vec<u8>,
}

impl Bitstring {
    /// An all-clear bitstring of `size_bits` bits.
    ///
    /// # Errors
    ///
    /// [`StatusError::InvalidSize`] unless `size_bits` is a positive
    /// multiple of 8.
    pub fn new(size_bits: usize) -> Result<Self, StatusError> {
        if size_bits == 0 || size_bits % 8 != 0 {
            return Err(StatusError::InvalidSize(size_bits));
        }
        Ok(Self {
            bytes: vec![0u8; size_bits / 8],
        })
    }

    /// Decode a base64 `encodedList` value.
    pub fn decode(encoded: &str) -> Result<Self, StatusError> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| StatusError::MalformedEncoding(e.to_string()))?;
        if bytes.is_empty() {
            return Err(StatusError::MalformedEncoding(
                "encoded list is empty".to_string(),
            ));
        }
        Ok(Self { bytes })
    }

    /// Encode for the `encodedList` field.
    pub fn encode(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// List capacity in bits.
    pub fn len_bits(&self) -> usize {
        self.bytes.len() * 8
    }

    fn position(&self, index: u64) -> Result<(usize, u8), StatusError> {
        let size = self.len_bits();
        if index >= size as u64 {
            return Err(StatusError::OutOfRange { index, size });
        }
        let byte = (index / 8) as usize;
        let mask = 0x80u8 >> (index % 8);
        Ok((byte, mask))
    }

    /// Read the bit at `index`.
    pub fn get(&self, index: u64) -> Result<bool, StatusError> {
        let (byte, mask) = self.position(index)?;
        Ok(self.bytes[byte] & mask != 0)
    }

    /// Set or clear the bit at `index`, returning its previous value.
    /// Setting an already-set bit is a no-op, so the operation is
    /// idempotent.
    pub fn set(&mut self, index: u64, value: bool) -> Result<bool, StatusError> {
        let (byte, mask) = self.position(index)?;
        let previous = self.bytes[byte] & mask != 0;
        if value {
            self.bytes[byte] |= mask;
        } else {
            self.bytes[byte] &= !mask;
        }
        Ok(previous)
    }

    /// Number of set bits.
    pub fn count_set(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }
}

/// The `encodedList` for a fresh list of `size_bits` bits, all clear.
pub fn create_encoded_bit_string(size_bits: usize) -> Result<String, StatusError> {
    Ok(Bitstring::new(size_bits)?.encode())
}

/// Read one status bit out of an encoded list.
pub fn get_status(encoded: &str, index: u64) -> Result<bool, StatusError> {
    Bitstring::decode(encoded)?.get(index)
}

/// Return a new encoded list with the bit at `index` set or cleared.
pub fn update_status(encoded: &str, index: u64, value: bool) -> Result<String, StatusError> {
    let mut bits = Bitstring::decode(encoded)?;
    bits.set(index, value)?;
    Ok(bits.encode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fresh_list_is_all_clear() {
        let bits = Bitstring::new(DEFAULT_SIZE_BITS).unwrap();
        assert_eq!(bits.len_bits(), DEFAULT_SIZE_BITS);
        assert_eq!(bits.count_set(), 0);
        for index in [0u64, 1, 7, 8, 16_383] {
            assert!(!bits.get(index).unwrap());
        }
    }

    #[test]
    fn rejects_bad_sizes() {
        assert!(matches!(Bitstring::new(0), Err(StatusError::InvalidSize(0))));
        assert!(matches!(
            Bitstring::new(12),
            Err(StatusError::InvalidSize(12))
        ));
    }

    #[test]
    fn bit_zero_is_msb_of_first_byte() {
        let mut bits = Bitstring::new(8).unwrap();
        bits.set(0, true).unwrap();
        assert_eq!(bits.encode(), STANDARD.encode([0x80u8]));
    }

    #[test]
    fn set_reports_previous_value() {
        let mut bits = Bitstring::new(64).unwrap();
        assert!(!bits.set(10, true).unwrap());
        assert!(bits.set(10, true).unwrap());
        assert!(bits.set(10, false).unwrap());
        assert!(!bits.get(10).unwrap());
    }

    #[test]
    fn setting_one_bit_leaves_others_clear() {
        let mut bits = Bitstring::new(256).unwrap();
        bits.set(100, true).unwrap();
        for index in 0..256u64 {
            assert_eq!(bits.get(index).unwrap(), index == 100);
        }
    }

    #[test]
    fn out_of_range_is_rejected() {
        let bits = Bitstring::new(64).unwrap();
        assert!(matches!(
            bits.get(64),
            Err(StatusError::OutOfRange { index: 64, size: 64 })
        ));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(Bitstring::decode("not!!base64").is_err());
        assert!(Bitstring::decode("").is_err());
    }

    #[test]
    fn helpers_compose() {
        let encoded = create_encoded_bit_string(128).unwrap();
        assert!(!get_status(&encoded, 42).unwrap());
        let updated = update_status(&encoded, 42, true).unwrap();
        assert!(get_status(&updated, 42).unwrap());
        assert!(!get_status(&updated, 41).unwrap());
        assert!(!get_status(&updated, 43).unwrap());
    }

    proptest! {
        #[test]
        fn encode_decode_preserves_bits(indices in prop::collection::btree_set(0u64..512, 0..40)) {
            let mut bits = Bitstring::new(512).unwrap();
            for &i in &indices {
                bits.set(i, true).unwrap();
            }
            let decoded = Bitstring::decode(&bits.encode()).unwrap();
            for i in 0..512u64 {
                prop_assert_eq!(decoded.get(i).unwrap(), indices.contains(&i));
            }
        }

        #[test]
        fn set_then_clear_restores_original(index in 0u64..1024) {
            let original = Bitstring::new(1024).unwrap();
            let mut bits = original.clone();
            bits.set(index, true).unwrap();
            bits.set(index, false).unwrap();
            prop_assert_eq!(bits, original);
        }
    }
}
