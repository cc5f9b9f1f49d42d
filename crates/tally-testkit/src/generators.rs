//! Proptest generators for property-based testing.

use proptest::prelude::*;

use tally_core::{Address, Identity, Keypair, TxPayload, TxType};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random identity.
pub fn identity() -> impl Strategy<Value = Identity> {
    any::<[u8; 32]>().prop_map(|seed| Identity::from_seed(&seed))
}

/// Generate a random address.
pub fn address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::from_bytes)
}

/// Generate a transaction type, including unrecognized ones.
pub fn tx_type() -> impl Strategy<Value = TxType> {
    prop_oneof![
        Just(TxType::Mint),
        Just(TxType::Check),
        Just(TxType::Send),
        "[a-z]{1,12}".prop_map(|s| TxType::parse(&s)),
    ]
}

/// Generate an arbitrary payload.
pub fn tx_payload() -> impl Strategy<Value = TxPayload> {
    (tx_type(), any::<u64>(), address(), address()).prop_map(|(tx_type, amount, from, to)| {
        TxPayload {
            tx_type,
            amount,
            from,
            to,
        }
    })
}

/// One send between two users of a fixture, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendStep {
    pub from: usize,
    pub to: usize,
    pub amount: u64,
}

/// Generate a sequence of sends among `users` users.
///
/// Amounts stay small so that a good share of the steps succeed against
/// balances in the low thousands.
pub fn send_plan(users: usize, max_steps: usize) -> impl Strategy<Value = Vec<SendStep>> {
    prop::collection::vec(
        (0..users, 0..users, 0u64..=600).prop_map(|(from, to, amount)| SendStep { from, to, amount }),
        0..=max_steps,
    )
}
