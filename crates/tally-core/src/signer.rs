//! Signing and signer recovery.
//!
//! The ledger only needs to learn *who* signed a digest. [`Verifier`] is that
//! capability; [`Signer`] is its counterpart on the client side.
//!
//! Ed25519 has no native public-key recovery, so [`RecoverableSignature`]
//! carries the signer's public key next to the signature. `recover` checks the
//! signature under that key and only then derives the address from it.

use serde::{Deserialize, Serialize};

use crate::crypto::{Digest, Ed25519PublicKey, Ed25519Signature, Keypair};
use crate::error::CoreError;
use crate::types::Address;

/// A signature bundled with the key needed to recover the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecoverableSignature {
    pub public_key: Ed25519PublicKey,
    pub signature: Ed25519Signature,
}

impl RecoverableSignature {
    pub fn new(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        Self {
            public_key,
            signature,
        }
    }

    /// The address the bundled key claims. Not authenticated until recovered.
    pub fn claimed_address(&self) -> Address {
        Address::from_public_key(&self.public_key)
    }
}

/// Produces signatures over digests.
pub trait Signer {
    fn sign(&self, keypair: &Keypair, digest: &Digest) -> RecoverableSignature;
}

/// Recovers the signer's address from a signature over a digest.
pub trait Verifier: Send + Sync {
    /// Returns the address that produced `signature` over `digest`.
    ///
    /// Fails with `InvalidSignature` or `InvalidPublicKey` if nothing can be
    /// recovered.
    fn recover(&self, signature: &RecoverableSignature, digest: &Digest)
        -> Result<Address, CoreError>;

    /// Whether `signature` over `digest` was produced by `address`.
    fn verify(&self, signature: &RecoverableSignature, digest: &Digest, address: &Address) -> bool {
        matches!(self.recover(signature, digest), Ok(recovered) if recovered == *address)
    }
}

/// Ed25519 over raw digest bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ed25519Scheme;

impl Signer for Ed25519Scheme {
    fn sign(&self, keypair: &Keypair, digest: &Digest) -> RecoverableSignature {
        RecoverableSignature {
            public_key: keypair.public_key(),
            signature: keypair.sign(digest.as_bytes()),
        }
    }
}

impl Verifier for Ed25519Scheme {
    fn recover(
        &self,
        signature: &RecoverableSignature,
        digest: &Digest,
    ) -> Result<Address, CoreError> {
        signature
            .public_key
            .verify(digest.as_bytes(), &signature.signature)?;
        Ok(Address::from_public_key(&signature.public_key))
    }
}
