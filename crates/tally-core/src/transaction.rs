//! Transaction: the signed instruction submitted to the ledger.
//!
//! A transaction is an immutable value. The signature covers exactly the four
//! payload fields and never itself.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::{canonical_payload_bytes, payload_digest};
use crate::crypto::{Digest, Keypair};
use crate::signer::{Ed25519Scheme, RecoverableSignature, Signer};
use crate::types::{Address, TxId};

/// Domain tag for transaction identifiers.
const TX_ID_DOMAIN: &[u8] = b"tally-txid-v0:";

/// The type of a transaction, determining which ledger rule applies.
///
/// `Unrecognized` keeps whatever type string arrived on the wire so that the
/// signature over it still verifies and the ledger can reject it by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TxType {
    /// Issue new value. Only the issuer may mint.
    Mint,
    /// Read the sender's balance. Never mutates state.
    Check,
    /// Move value between two accounts.
    Send,
    /// Any other type string.
    Unrecognized(UnknownType),
}

/// A type string that names none of the known types.
///
/// Only [`TxType::parse`] and `From<String>` build one, so a known name can
/// never hide behind `Unrecognized` and hash like the real type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownType(String);

impl UnknownType {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UnknownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TxType {
    /// The wire string for this type.
    pub fn as_str(&self) -> &str {
        match self {
            TxType::Mint => "mint",
            TxType::Check => "check",
            TxType::Send => "send",
            TxType::Unrecognized(s) => s.as_str(),
        }
    }

    /// Parse a wire string. Never fails; unknown strings become `Unrecognized`.
    pub fn parse(s: &str) -> Self {
        Self::known(s).unwrap_or_else(|| TxType::Unrecognized(UnknownType(s.to_owned())))
    }

    fn known(s: &str) -> Option<Self> {
        match s {
            "mint" => Some(TxType::Mint),
            "check" => Some(TxType::Check),
            "send" => Some(TxType::Send),
            _ => None,
        }
    }

    /// Whether an accepted transaction of this type changes balances.
    pub fn is_state_transition(&self) -> bool {
        matches!(self, TxType::Mint | TxType::Send)
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TxType {
    fn from(s: String) -> Self {
        match Self::known(&s) {
            Some(known) => known,
            None => TxType::Unrecognized(UnknownType(s)),
        }
    }
}

impl From<&str> for TxType {
    fn from(s: &str) -> Self {
        TxType::parse(s)
    }
}

impl From<TxType> for String {
    fn from(t: TxType) -> Self {
        match t {
            TxType::Unrecognized(s) => s.into_string(),
            known => known.as_str().to_string(),
        }
    }
}

/// The signed portion of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxPayload {
    #[serde(rename = "type")]
    pub tx_type: TxType,

    /// Amount moved or minted. Ignored by `check`.
    pub amount: u64,

    /// The account that signed the transaction.
    pub from: Address,

    /// The counterparty.
    pub to: Address,
}

impl TxPayload {
    pub fn new(tx_type: impl Into<TxType>, amount: u64, from: Address, to: Address) -> Self {
        Self {
            tx_type: tx_type.into(),
            amount,
            from,
            to,
        }
    }

    pub fn mint(issuer: Address, to: Address, amount: u64) -> Self {
        Self::new(TxType::Mint, amount, issuer, to)
    }

    pub fn send(from: Address, to: Address, amount: u64) -> Self {
        Self::new(TxType::Send, amount, from, to)
    }

    /// A balance query. `to` is the sender itself.
    pub fn check(from: Address) -> Self {
        Self::new(TxType::Check, 0, from, from)
    }

    /// The digest that gets signed.
    pub fn digest(&self) -> Digest {
        payload_digest(self)
    }

    /// Sign with the Ed25519 scheme.
    pub fn sign(self, keypair: &Keypair) -> Transaction {
        let signature = Ed25519Scheme.sign(keypair, &self.digest());
        Transaction {
            payload: self,
            signature,
        }
    }
}

/// A complete transaction: payload + signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub payload: TxPayload,

    /// Signature over `payload_digest(payload)`.
    pub signature: RecoverableSignature,
}

impl Transaction {
    pub fn new(payload: TxPayload, signature: RecoverableSignature) -> Self {
        Self { payload, signature }
    }

    /// Compute the transaction ID over canonical payload bytes and signature.
    pub fn compute_id(&self) -> TxId {
        let mut buf = canonical_payload_bytes(&self.payload);
        buf.extend_from_slice(self.signature.public_key.as_bytes());
        buf.extend_from_slice(self.signature.signature.as_bytes());
        Digest::hash_with_domain(TX_ID_DOMAIN, &buf).into()
    }

    pub fn tx_type(&self) -> &TxType {
        &self.payload.tx_type
    }

    pub fn sender(&self) -> &Address {
        &self.payload.from
    }

    pub fn recipient(&self) -> &Address {
        &self.payload.to
    }

    pub fn amount(&self) -> u64 {
        self.payload.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_of(keypair: &Keypair) -> Address {
        Address::from_public_key(&keypair.public_key())
    }

    #[test]
    fn test_tx_type_wire_strings() {
        for (s, t) in [
            ("mint", TxType::Mint),
            ("check", TxType::Check),
            ("send", TxType::Send),
        ] {
            assert_eq!(TxType::parse(s), t);
            assert_eq!(t.as_str(), s);
        }
        assert!(matches!(TxType::parse("burn"), TxType::Unrecognized(_)));
        assert_eq!(TxType::parse("burn").as_str(), "burn");
        assert_eq!(TxType::from("burn".to_string()), TxType::parse("burn"));
    }

    #[test]
    fn test_known_names_never_unrecognized() {
        for name in ["mint", "check", "send"] {
            assert!(!matches!(TxType::parse(name), TxType::Unrecognized(_)));
            assert!(!matches!(TxType::from(name.to_string()), TxType::Unrecognized(_)));
        }

        let a = Address::from_bytes([0x0a; 20]);
        let aliased = TxPayload::new("mint".to_string(), 5, a, a);
        assert_eq!(aliased, TxPayload::mint(a, a, 5));
        assert_eq!(aliased.digest(), TxPayload::mint(a, a, 5).digest());
    }

    #[test]
    fn test_tx_type_state_transition() {
        assert!(TxType::Mint.is_state_transition());
        assert!(TxType::Send.is_state_transition());
        assert!(!TxType::Check.is_state_transition());
        assert!(!TxType::parse("refund").is_state_transition());
    }

    #[test]
    fn test_payload_json_shape() {
        let payload = TxPayload::send(
            Address::from_bytes([0x01; 20]),
            Address::from_bytes([0x02; 20]),
            25,
        );
        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "send");
        assert_eq!(json["amount"], 25);
        assert_eq!(json["from"], Address::from_bytes([0x01; 20]).to_hex());

        let back: TxPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_unknown_type_survives_json() {
        let json = serde_json::json!({
            "type": "refund",
            "amount": 3,
            "from": Address::from_bytes([0x01; 20]).to_hex(),
            "to": Address::from_bytes([0x02; 20]).to_hex(),
        });
        let payload: TxPayload = serde_json::from_value(json).unwrap();
        assert_eq!(payload.tx_type.as_str(), "refund");
        assert!(matches!(payload.tx_type, TxType::Unrecognized(_)));
    }

    #[test]
    fn test_check_targets_sender() {
        let addr = Address::from_bytes([0x09; 20]);
        let payload = TxPayload::check(addr);
        assert_eq!(payload.from, addr);
        assert_eq!(payload.to, addr);
        assert_eq!(payload.tx_type, TxType::Check);
    }

    #[test]
    fn test_tx_id_deterministic_and_signature_bound() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let from = address_of(&keypair);
        let to = Address::from_bytes([0x77; 20]);

        let tx = TxPayload::send(from, to, 10).sign(&keypair);
        assert_eq!(tx.compute_id(), tx.compute_id());

        let other = TxPayload::send(from, to, 11).sign(&keypair);
        assert_ne!(tx.compute_id(), other.compute_id());
    }

    #[test]
    fn test_accessors_read_payload() {
        let keypair = Keypair::from_seed(&[0x05; 32]);
        let sender = address_of(&keypair);
        let recipient = Address::from_bytes([0x06; 20]);
        let tx = TxPayload::send(sender, recipient, 42).sign(&keypair);

        assert_eq!(tx.tx_type(), &TxType::Send);
        assert_eq!(tx.sender(), &sender);
        assert_eq!(tx.recipient(), &recipient);
        assert_eq!(tx.amount(), 42);
    }
}
