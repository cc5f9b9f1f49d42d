//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use tally::{Client, Ledger, LedgerConfig, Outcome, Transaction};
use tally_core::Address;

/// An issuer, a set of users, and a ledger owned by the issuer.
pub struct TestFixture {
    pub issuer: Client,
    pub users: Vec<Client>,
    pub ledger: Ledger,
}

impl TestFixture {
    /// A ledger with default config and `user_count` unfunded users.
    pub fn new(user_count: usize) -> Self {
        Self::with_config(user_count, LedgerConfig::default())
    }

    pub fn with_config(user_count: usize, config: LedgerConfig) -> Self {
        let issuer = Client::from_seed(&[0xff; 32]);
        let ledger = Ledger::new(issuer.address(), config);
        Self {
            issuer,
            users: multi_party_clients(user_count),
            ledger,
        }
    }

    /// One user per entry in `balances`, each minted that amount.
    ///
    /// Zero entries are skipped, so the user exists only once it transacts.
    pub fn funded(balances: &[u64]) -> Self {
        let fixture = Self::new(balances.len());
        for (i, &amount) in balances.iter().enumerate() {
            if amount > 0 {
                let tx = fixture.issuer.mint(fixture.address(i), amount);
                if let Err(err) = fixture.ledger.process_transaction(&tx) {
                    panic!("funding user {i} with {amount} failed: {err}");
                }
            }
        }
        fixture
    }

    pub fn user(&self, i: usize) -> &Client {
        &self.users[i]
    }

    pub fn address(&self, i: usize) -> Address {
        self.users[i].address()
    }

    /// Balance of user `i`, zero if the user has no account yet.
    pub fn balance_of(&self, i: usize) -> u64 {
        self.ledger.balance(&self.address(i)).unwrap_or(0)
    }

    /// A signed send between two users.
    pub fn send(&self, from: usize, to: usize, amount: u64) -> Transaction {
        self.users[from].send(self.address(to), amount)
    }

    pub fn submit(&self, tx: &Transaction) -> tally::Result<Outcome> {
        self.ledger.process_transaction(tx)
    }
}

/// Deterministic clients for multi-party tests.
pub fn multi_party_clients(count: usize) -> Vec<Client> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[..8].copy_from_slice(&(i as u64).to_le_bytes());
            Client::from_seed(&seed)
        })
        .collect()
}
