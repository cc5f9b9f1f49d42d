//! Client: the end-user side that builds and signs transactions.

use tally_core::{
    payload_digest, Address, Digest, Ed25519Scheme, Identity, RecoverableSignature, Signer,
    Transaction, TxPayload, TxType, Verifier,
};

/// A user holding one identity.
///
/// The client never talks to a ledger; it only produces transactions that a
/// ledger can verify.
#[derive(Debug, Clone)]
pub struct Client {
    identity: Identity,
}

impl Client {
    /// A client with a fresh random identity.
    pub fn new() -> Self {
        Self::from_identity(Identity::generate())
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_identity(Identity::from_seed(seed))
    }

    pub fn from_identity(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn address(&self) -> Address {
        self.identity.address()
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The digest a signature over `payload` covers.
    pub fn hash(&self, payload: &TxPayload) -> Digest {
        payload_digest(payload)
    }

    pub fn sign(&self, payload: &TxPayload) -> RecoverableSignature {
        Ed25519Scheme.sign(self.identity.keypair(), &self.hash(payload))
    }

    /// Whether `signature` over `digest` was produced by `address`.
    pub fn verify(&self, signature: &RecoverableSignature, digest: &Digest, address: &Address) -> bool {
        Ed25519Scheme.verify(signature, digest, address)
    }

    /// Build and sign a transaction from this client's address.
    pub fn generate_tx(&self, to: Address, amount: u64, tx_type: impl Into<TxType>) -> Transaction {
        let payload = TxPayload::new(tx_type, amount, self.address(), to);
        let signature = self.sign(&payload);
        Transaction::new(payload, signature)
    }

    pub fn mint(&self, to: Address, amount: u64) -> Transaction {
        self.generate_tx(to, amount, TxType::Mint)
    }

    pub fn send(&self, to: Address, amount: u64) -> Transaction {
        self.generate_tx(to, amount, TxType::Send)
    }

    pub fn check(&self) -> Transaction {
        self.generate_tx(self.address(), 0, TxType::Check)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_tx_is_signed_by_client() {
        let client = Client::from_seed(&[0x05; 32]);
        let to = Address::from_bytes([0x06; 20]);
        let tx = client.generate_tx(to, 42, "send");

        assert_eq!(tx.payload.from, client.address());
        assert_eq!(tx.payload.to, to);
        assert_eq!(tx.payload.amount, 42);
        assert_eq!(tx.payload.tx_type, TxType::Send);

        let digest = client.hash(&tx.payload);
        assert!(client.verify(&tx.signature, &digest, &client.address()));
        assert!(!client.verify(&tx.signature, &digest, &to));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let client = Client::from_seed(&[0x05; 32]);
        let to = Address::from_bytes([0x06; 20]);
        assert_eq!(client.send(to, 1), client.send(to, 1));
    }

    #[test]
    fn test_check_addresses_self() {
        let client = Client::new();
        let tx = client.check();
        assert_eq!(tx.payload.tx_type, TxType::Check);
        assert_eq!(tx.payload.to, client.address());
    }
}
