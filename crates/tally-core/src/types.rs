//! Strong type definitions for Tally.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::crypto::{decode_hex_array, Digest, Ed25519PublicKey};
use crate::error::CoreError;

/// Domain tag for deriving an address from a public key.
const ADDRESS_DOMAIN: &[u8] = b"tally-address-v0:";

/// A 20-byte account address.
///
/// Derived as the first 20 bytes of `Blake3("tally-address-v0:" || public_key)`.
/// Rendered as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const LEN: usize = 20;

    /// Derive the address controlled by a public key.
    pub fn from_public_key(public_key: &Ed25519PublicKey) -> Self {
        let digest = Digest::hash_with_domain(ADDRESS_DOMAIN, public_key.as_bytes());
        let mut arr = [0u8; Self::LEN];
        arr.copy_from_slice(&digest.0[..Self::LEN]);
        Self(arr)
    }

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Convert to `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        decode_hex_array(s)
            .map(Self)
            .map_err(|e| CoreError::InvalidAddress(format!("{s}: {e}")))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_hex()
    }
}

impl TryFrom<String> for Address {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

/// A 32-byte transaction identifier, computed over the canonical payload and
/// the signature.
///
/// This is the content-address of an accepted transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxId(pub [u8; 32]);

impl TxId {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        decode_hex_array(s).map(Self)
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Digest> for TxId {
    fn from(d: Digest) -> Self {
        Self(d.0)
    }
}

impl From<TxId> for String {
    fn from(id: TxId) -> Self {
        id.to_hex()
    }
}

impl TryFrom<String> for TxId {
    type Error = hex::FromHexError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}
