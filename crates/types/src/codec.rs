// Path: crates/types/src/codec.rs

//! Defines the canonical, deterministic binary codec for all consensus-critical state.
//!
//! This module provides simple wrappers around `parity-scale-codec` (SCALE), chosen
//! for its compact and deterministic properties. Centralizing the codec here ensures
//! that every layer of the stack uses the exact same representation for stored
//! values and sign bytes.

use crate::error::TxError;
use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into its deterministic, canonical byte representation.
///
/// Use this for all data written to consensus-critical state or included in
/// a hash for signing or replay protection.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Vec<u8> {
    v.encode()
}

/// Decodes a value from its canonical byte representation.
///
/// Fails fast on any decoding error, including trailing bytes.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, TxError> {
    T::decode_all(&mut &*b)
        .map_err(|e| TxError::InvalidFormat(format!("canonical decode failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[derive(Encode, Decode, Debug, PartialEq, Eq)]
    struct TestStruct {
        id: u32,
        name: String,
        tags: Vec<u8>,
    }

    #[test]
    fn test_canonical_codec_roundtrip() {
        let original_struct = TestStruct {
            id: 42,
            name: "test-data".to_string(),
            tags: vec![1, 2, 3],
        };

        let encoded = to_bytes_canonical(&original_struct);
        assert!(!encoded.is_empty());

        let decoded = from_bytes_canonical::<TestStruct>(&encoded).unwrap();
        assert_eq!(original_struct, decoded);

        let mut original_set = BTreeSet::new();
        original_set.insert([1u8; 32]);
        original_set.insert([2u8; 32]);

        let encoded_set = to_bytes_canonical(&original_set);
        let decoded_set = from_bytes_canonical::<BTreeSet<[u8; 32]>>(&encoded_set).unwrap();
        assert_eq!(original_set, decoded_set);
    }

    #[test]
    fn test_canonical_decode_failure() {
        let original_struct = TestStruct {
            id: 99,
            name: "another-test".to_string(),
            tags: vec![10, 20, 30, 40, 50],
        };

        let mut encoded = to_bytes_canonical(&original_struct);
        encoded.pop();
        encoded.pop();

        let err = from_bytes_canonical::<TestStruct>(&encoded).unwrap_err();
        assert!(err.to_string().contains("canonical decode failed"));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut encoded = to_bytes_canonical(&7u32);
        encoded.push(0);
        assert!(from_bytes_canonical::<u32>(&encoded).is_err());
    }
}
