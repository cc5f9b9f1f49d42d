//! # Tally Core
//!
//! Pure primitives for the Tally ledger: addresses, identities, signatures,
//! transactions, and the canonical payload hash.
//!
//! This crate contains no I/O, no locking, and no ledger state. It is the
//! vocabulary shared by whoever signs a transaction and whoever validates it.
//!
//! ## Key Types
//!
//! - [`Address`] - 20-byte account identifier derived from a public key
//! - [`Identity`] - A keypair together with its address
//! - [`Transaction`] - A signed [`TxPayload`] (`type`, `amount`, `from`, `to`)
//! - [`RecoverableSignature`] - Ed25519 signature that can name its signer
//! - [`Digest`] - Blake3 hash of a canonical payload
//!
//! ## Canonicalization
//!
//! Payloads are hashed over deterministic CBOR. See the [`canonical`] module.
//! Signer and verifier both go through [`payload_digest`], so they always
//! agree on the bytes that were signed.

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod signer;
pub mod transaction;
pub mod types;
pub mod validation;

pub use canonical::{canonical_payload_bytes, canonical_value_bytes, payload_digest};
pub use crypto::{Digest, Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::{CoreError, ValidationError};
pub use identity::Identity;
pub use signer::{Ed25519Scheme, RecoverableSignature, Signer, Verifier};
pub use transaction::{Transaction, TxPayload, TxType, UnknownType};
pub use types::{Address, TxId};
pub use validation::verify_transaction_signature;
