//! # Tally
//!
//! A centralized ledger run by a single trusted issuer. Accounts hold
//! balances; users submit signed transactions that mint, check, or send
//! value.
//!
//! ## Overview
//!
//! - **Ledger**: owns account balances and the history of accepted
//!   transactions, and validates every incoming transaction through four
//!   ordered gates (signature, accounts, type, apply).
//! - **Client**: holds an identity and produces signed transactions.
//!
//! ## Key Concepts
//!
//! - **Issuer**: the only account allowed to mint. Its account is funded when
//!   the ledger is created.
//! - **Lazy provisioning**: any address that takes part in a transaction gets
//!   a zero-balance account, even if the transaction is then rejected.
//! - **Mint policy**: by default a mint draws down the issuer's reserve; with
//!   [`MintPolicy::Unbounded`] it only credits the recipient.
//!
//! ## Usage
//!
//! ```rust
//! use tally::{Client, Ledger, LedgerConfig, Outcome};
//!
//! let issuer = Client::new();
//! let alice = Client::new();
//! let ledger = Ledger::new(issuer.address(), LedgerConfig::default());
//!
//! let outcome = ledger.process_transaction(&issuer.mint(alice.address(), 500)).unwrap();
//! assert!(matches!(outcome, Outcome::Minted { amount: 500, .. }));
//! assert_eq!(ledger.balance(&alice.address()), Some(500));
//! ```
//!
//! ## Re-exports
//!
//! - `tally::core` - Core primitives (Address, Transaction, signatures, hashing)

pub mod client;
pub mod config;
pub mod error;
pub mod ledger;
pub mod outcome;
pub mod stage;
pub mod state;

pub use tally_core as core;

pub use client::Client;
pub use config::{LedgerConfig, MintPolicy, DEFAULT_ISSUER_BALANCE};
pub use error::{LedgerError, Result};
pub use ledger::Ledger;
pub use outcome::{BalanceReport, Outcome};
pub use stage::TxStage;
pub use state::Account;

pub use tally_core::{
    Address, Digest, Ed25519Scheme, Identity, Keypair, RecoverableSignature, Signer, Transaction,
    TxId, TxPayload, TxType, UnknownType, Verifier,
};
