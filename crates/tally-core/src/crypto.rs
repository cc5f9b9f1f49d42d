//! Cryptographic primitives for Tally.
//!
//! Wraps Ed25519 signing and Blake3 hashing with strong types.

use ed25519_dalek::{Signature, Signer as _, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Decode a fixed-length hex string, accepting an optional `0x` prefix.
pub(crate) fn decode_hex_array<const N: usize>(s: &str) -> Result<[u8; N], hex::FromHexError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s)?;
    if bytes.len() != N {
        return Err(hex::FromHexError::InvalidStringLength);
    }
    let mut arr = [0u8; N];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

/// A fixed-size byte newtype shown and serialized as lowercase hex.
macro_rules! hex_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(pub [u8; $len]);

        impl $name {
            pub const LEN: usize = $len;
            pub const ZERO: Self = Self([0u8; $len]);

            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
                decode_hex_array(s).map(Self)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({}..)"), &self.to_hex()[..16])
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_hex()
            }
        }

        impl TryFrom<String> for $name {
            type Error = hex::FromHexError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::from_hex(&s)
            }
        }
    };
}

hex_bytes!(
    /// A 32-byte Blake3 digest.
    Digest, 32, "Digest"
);

hex_bytes!(
    /// A 32-byte Ed25519 public key.
    Ed25519PublicKey, 32, "Ed25519Pub"
);

hex_bytes!(
    /// A 64-byte Ed25519 signature.
    Ed25519Signature, 64, "Ed25519Sig"
);

impl Digest {
    /// Blake3 of `data`.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Blake3 of `domain || data`.
    pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain);
        hasher.update(data);
        Self(*hasher.finalize().as_bytes())
    }
}

impl Ed25519PublicKey {
    /// Check `signature` over `message` under this key.
    ///
    /// Uses strict verification, so small-order keys and malleable
    /// signatures are refused.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CoreError> {
        let key = VerifyingKey::from_bytes(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;
        key.verify_strict(message, &Signature::from_bytes(&signature.0))
            .map_err(|_| CoreError::InvalidSignature)
    }
}

/// An Ed25519 signing key with its public half precomputed.
///
/// The secret never leaves this type.
#[derive(Clone)]
pub struct Keypair {
    secret: SigningKey,
    public: Ed25519PublicKey,
}

impl Keypair {
    /// A fresh key from the operating system's RNG.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// A deterministic key; the same seed always yields the same address.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(seed))
    }

    fn from_signing_key(secret: SigningKey) -> Self {
        let public = Ed25519PublicKey(secret.verifying_key().to_bytes());
        Self { secret, public }
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        self.public
    }

    /// Deterministic: signing the same message twice gives the same bytes.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.secret.sign(message).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_sign_verify() {
        let keypair = Keypair::generate();
        let message = b"mint 500";
        let signature = keypair.sign(message);

        keypair
            .public_key()
            .verify(message, &signature)
            .expect("valid signature should verify");

        assert!(keypair.public_key().verify(b"mint 501", &signature).is_err());
    }

    #[test]
    fn test_keypair_deterministic_from_seed() {
        let seed = [0x42u8; 32];
        let kp1 = Keypair::from_seed(&seed);
        let kp2 = Keypair::from_seed(&seed);
        assert_eq!(kp1.public_key(), kp2.public_key());
        assert_eq!(kp1.sign(b"x"), kp2.sign(b"x"));
    }

    #[test]
    fn test_domain_separation() {
        let data = b"payload";
        assert_ne!(Digest::hash(data), Digest::hash_with_domain(b"tag:", data));
        assert_ne!(
            Digest::hash_with_domain(b"a:", data),
            Digest::hash_with_domain(b"b:", data)
        );
    }

    #[test]
    fn test_hex_accepts_prefix() {
        let digest = Digest::hash(b"abc");
        let prefixed = format!("0x{}", digest.to_hex());
        assert_eq!(Digest::from_hex(&prefixed).unwrap(), digest);
        assert!(Digest::from_hex("0xabcd").is_err());
    }

    #[test]
    fn test_signature_json_roundtrip() {
        let keypair = Keypair::from_seed(&[0x07; 32]);
        let sig = keypair.sign(b"hello");
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, format!("\"{}\"", sig.to_hex()));
        let back: Ed25519Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }
}
