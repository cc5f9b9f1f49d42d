//! Golden test vectors for deterministic verification.
//!
//! Each vector pins the canonical CBOR encoding of one payload. Any client
//! that signs for this ledger must produce exactly these bytes.

use tally_core::canonical::decode_payload;
use tally_core::{canonical_payload_bytes, Address, TxPayload, TxType};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Wire name of the transaction type.
    pub tx_type: &'static str,
    pub amount: u64,
    /// Sender address, as a repeated byte.
    pub from: u8,
    /// Recipient address, as a repeated byte.
    pub to: u8,
    /// Expected canonical encoding (hex).
    pub expected_canonical: &'static str,
}

impl GoldenVector {
    /// The payload this vector describes.
    pub fn payload(&self) -> TxPayload {
        TxPayload::new(
            TxType::parse(self.tx_type),
            self.amount,
            Address::from_bytes([self.from; 20]),
            Address::from_bytes([self.to; 20]),
        )
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "mint 500",
            tx_type: "mint",
            amount: 500,
            from: 0x11,
            to: 0x22,
            expected_canonical: "a462746f542222222222222222222222222222222222222222\
                6466726f6d541111111111111111111111111111111111111111\
                6474797065646d696e74\
                66616d6f756e741901f4",
        },
        GoldenVector {
            name: "send zero",
            tx_type: "send",
            amount: 0,
            from: 0x22,
            to: 0x33,
            expected_canonical: "a462746f543333333333333333333333333333333333333333\
                6466726f6d542222222222222222222222222222222222222222\
                64747970656473656e64\
                66616d6f756e7400",
        },
        GoldenVector {
            name: "check self",
            tx_type: "check",
            amount: 0,
            from: 0x44,
            to: 0x44,
            expected_canonical: "a462746f544444444444444444444444444444444444444444\
                6466726f6d544444444444444444444444444444444444444444\
                647479706565636865636b\
                66616d6f756e7400",
        },
        GoldenVector {
            name: "send max amount",
            tx_type: "send",
            amount: u64::MAX,
            from: 0x01,
            to: 0x02,
            expected_canonical: "a462746f540202020202020202020202020202020202020202\
                6466726f6d540101010101010101010101010101010101010101\
                64747970656473656e64\
                66616d6f756e741bffffffffffffffff",
        },
        GoldenVector {
            name: "unrecognized type",
            tx_type: "refund",
            amount: 7,
            from: 0xaa,
            to: 0xbb,
            expected_canonical: "a462746f54bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb\
                6466726f6d54aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\
                647479706566726566756e64\
                66616d6f756e7407",
        },
    ]
}

/// Check every vector against the encoder and decoder.
///
/// Returns the names of failing vectors alongside what went wrong.
pub fn verify_all_vectors() -> Vec<(&'static str, String)> {
    let mut failures = Vec::new();

    for vector in all_vectors() {
        let payload = vector.payload();
        let actual = hex::encode(canonical_payload_bytes(&payload));
        if actual != vector.expected_canonical {
            failures.push((
                vector.name,
                format!("expected {}, got {actual}", vector.expected_canonical),
            ));
            continue;
        }

        let decoded = hex::decode(vector.expected_canonical)
            .map_err(|e| e.to_string())
            .and_then(|bytes| decode_payload(&bytes).map_err(|e| e.to_string()));
        match decoded {
            Ok(decoded) if decoded == payload => {}
            Ok(decoded) => failures.push((vector.name, format!("decoded to {decoded:?}"))),
            Err(e) => failures.push((vector.name, e)),
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors_match_encoder() {
        let failures = verify_all_vectors();
        assert!(failures.is_empty(), "failing vectors: {failures:?}");
    }

    #[test]
    fn test_vector_digests_are_distinct() {
        let digests: std::collections::HashSet<_> =
            all_vectors().iter().map(|v| v.payload().digest()).collect();
        assert_eq!(digests.len(), all_vectors().len());
    }

    #[test]
    fn test_unrecognized_type_survives_decode() {
        let vector = all_vectors()
            .into_iter()
            .find(|v| v.tx_type == "refund")
            .unwrap();
        let bytes = hex::decode(vector.expected_canonical).unwrap();
        let decoded = decode_payload(&bytes).unwrap();
        assert!(matches!(&decoded.tx_type, TxType::Unrecognized(name) if name.as_str() == "refund"));
    }
}
