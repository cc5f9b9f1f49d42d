//! Canonical CBOR encoding for deterministic hashing.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats
//!
//! A transaction payload is encoded as a map with text keys `type`, `amount`,
//! `from` and `to`. Because keys are sorted by their encoded bytes, the order in
//! which entries are assembled never affects the output, so a signer and a
//! verifier that rebuild the payload independently always hash the same bytes.

use ciborium::value::Value;

use crate::crypto::Digest;
use crate::error::CoreError;
use crate::transaction::{TxPayload, TxType};
use crate::types::Address;

/// Domain tag for payload digests.
pub const PAYLOAD_DOMAIN: &[u8] = b"tally-tx-v0:";

/// Payload field keys.
mod keys {
    pub const TYPE: &str = "type";
    pub const AMOUNT: &str = "amount";
    pub const FROM: &str = "from";
    pub const TO: &str = "to";
}

/// Encode a transaction payload to canonical CBOR bytes.
pub fn canonical_payload_bytes(payload: &TxPayload) -> Vec<u8> {
    let mut entries = Vec::with_capacity(4);

    let mut push = |key: &str, value: Vec<u8>| {
        let mut key_buf = Vec::new();
        encode_text(&mut key_buf, key);
        entries.push((key_buf, value));
    };

    let mut type_buf = Vec::new();
    encode_text(&mut type_buf, payload.tx_type.as_str());
    push(keys::TYPE, type_buf);

    let mut amount_buf = Vec::new();
    encode_uint(&mut amount_buf, 0, payload.amount);
    push(keys::AMOUNT, amount_buf);

    let mut from_buf = Vec::new();
    encode_bytes(&mut from_buf, payload.from.as_bytes());
    push(keys::FROM, from_buf);

    let mut to_buf = Vec::new();
    encode_bytes(&mut to_buf, payload.to.as_bytes());
    push(keys::TO, to_buf);

    let mut buf = Vec::new();
    write_map_sorted(&mut buf, entries);
    buf
}

/// The digest a transaction signature covers.
pub fn payload_digest(payload: &TxPayload) -> Digest {
    Digest::hash_with_domain(PAYLOAD_DOMAIN, &canonical_payload_bytes(payload))
}

/// Encode an arbitrary CBOR value canonically.
///
/// Fails on floats, tags and other values with no deterministic encoding here.
pub fn canonical_value_bytes(value: &Value) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value)?;
    Ok(buf)
}

/// Hash an arbitrary CBOR value over its canonical encoding.
pub fn hash_value(value: &Value) -> Result<Digest, CoreError> {
    canonical_value_bytes(value).map(|bytes| Digest::hash(&bytes))
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Array(arr) => {
            encode_uint(buf, 4, arr.len() as u64);
            for item in arr {
                encode_value_to(buf, item)?;
            }
        }
        Value::Map(entries) => {
            let mut encoded = Vec::with_capacity(entries.len());
            for (k, v) in entries {
                let mut key_buf = Vec::new();
                encode_value_to(&mut key_buf, k)?;
                let mut value_buf = Vec::new();
                encode_value_to(&mut value_buf, v)?;
                encoded.push((key_buf, value_buf));
            }
            encoded.sort_by(|a, b| a.0.cmp(&b.0));
            if encoded.windows(2).any(|pair| pair[0].0 == pair[1].0) {
                return Err(CoreError::EncodingError("duplicate map key".into()));
            }
            write_map_sorted(buf, encoded);
        }
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        Value::Float(_) => {
            return Err(CoreError::EncodingError(
                "floats not supported in canonical encoding".into(),
            ))
        }
        _ => {
            return Err(CoreError::EncodingError(
                "unsupported CBOR value type".into(),
            ))
        }
    }
    Ok(())
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Write a map (major type 5) from pre-encoded entries, sorted by key bytes.
fn write_map_sorted(buf: &mut Vec<u8>, mut entries: Vec<(Vec<u8>, Vec<u8>)>) {
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, entries.len() as u64);
    for (key, value) in entries {
        buf.extend_from_slice(&key);
        buf.extend_from_slice(&value);
    }
}

/// Decode a payload from canonical bytes.
///
/// Rejects input that parses but is not in canonical form, so every accepted
/// byte string has exactly one payload and vice versa.
pub fn decode_payload(bytes: &[u8]) -> Result<TxPayload, CoreError> {
    let value: Value =
        ciborium::from_reader(bytes).map_err(|e| CoreError::EncodingError(e.to_string()))?;

    let map = match &value {
        Value::Map(m) => m,
        _ => return Err(CoreError::EncodingError("expected map".into())),
    };
    if map.len() != 4 {
        return Err(CoreError::EncodingError(format!(
            "expected 4 fields, got {}",
            map.len()
        )));
    }

    let get = |key: &str| -> Option<&Value> {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Text(t) if t == key))
            .map(|(_, v)| v)
    };

    let tx_type = match get(keys::TYPE) {
        Some(Value::Text(s)) => TxType::parse(s),
        _ => return Err(CoreError::EncodingError("missing type".into())),
    };

    let amount = match get(keys::AMOUNT) {
        Some(Value::Integer(i)) => {
            u64::try_from(*i).map_err(|_| CoreError::EncodingError("amount out of range".into()))?
        }
        _ => return Err(CoreError::EncodingError("missing amount".into())),
    };

    let from = decode_address(get(keys::FROM), keys::FROM)?;
    let to = decode_address(get(keys::TO), keys::TO)?;

    let payload = TxPayload {
        tx_type,
        amount,
        from,
        to,
    };

    if canonical_payload_bytes(&payload) != bytes {
        return Err(CoreError::EncodingError("non-canonical encoding".into()));
    }

    Ok(payload)
}

fn decode_address(value: Option<&Value>, field: &str) -> Result<Address, CoreError> {
    match value {
        Some(Value::Bytes(b)) if b.len() == Address::LEN => {
            let mut arr = [0u8; Address::LEN];
            arr.copy_from_slice(b);
            Ok(Address(arr))
        }
        _ => Err(CoreError::EncodingError(format!("invalid {field}"))),
    }
}
