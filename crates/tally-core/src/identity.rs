//! Identity: a keypair and the address it controls.

use std::fmt;

use crate::crypto::{Ed25519PublicKey, Keypair};
use crate::types::Address;

/// A signing identity.
#[derive(Clone)]
pub struct Identity {
    keypair: Keypair,
    address: Address,
}

impl Identity {
    /// Create a fresh random identity.
    pub fn generate() -> Self {
        Self::from_keypair(Keypair::generate())
    }

    /// Create a deterministic identity from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_keypair(Keypair::from_seed(seed))
    }

    pub fn from_keypair(keypair: Keypair) -> Self {
        let address = Address::from_public_key(&keypair.public_key());
        Self { keypair, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.address)
    }
}
