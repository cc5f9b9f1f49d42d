//! The Ledger: account state plus the transaction validation pipeline.
//!
//! Every transaction runs through four ordered gates under one lock:
//!
//! 1. **Signature** - the payload digest must recover to `from`.
//! 2. **Accounts** - `from` and `to` get zero-balance accounts if missing.
//! 3. **Type** - one handler per [`TxType`] decides whether the transaction
//!    is allowed and, for mint/send, computes the resulting balances.
//! 4. **Apply** - balances are written and the transaction is recorded.
//!
//! The first failing gate ends processing. Nothing is written after a
//! failure except the accounts created at gate 2.

use parking_lot::Mutex;
use tally_core::{
    verify_transaction_signature, Address, Ed25519Scheme, Transaction, TxId, TxPayload, TxType,
    ValidationError, Verifier,
};
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::outcome::{BalanceReport, Outcome};
use crate::stage::TxStage;
use crate::state::{Account, LedgerState, TransferPlan};

/// What the type gate allows a transaction to do.
enum Authorization {
    Report(BalanceReport),
    Mint(TransferPlan),
    Send(TransferPlan),
}

/// A single-issuer ledger.
///
/// `process_transaction` takes `&self`; the ledger can be shared across
/// threads behind an `Arc`. All processing is serialized by an internal lock.
pub struct Ledger<V: Verifier = Ed25519Scheme> {
    issuer: Address,
    config: LedgerConfig,
    verifier: V,
    state: Mutex<LedgerState>,
}

impl Ledger<Ed25519Scheme> {
    /// Create a ledger owned by `issuer`, verifying Ed25519 signatures.
    pub fn new(issuer: Address, config: LedgerConfig) -> Self {
        Self::with_verifier(issuer, config, Ed25519Scheme)
    }
}

impl<V: Verifier> Ledger<V> {
    /// Create a ledger with a custom signature verifier.
    pub fn with_verifier(issuer: Address, config: LedgerConfig, verifier: V) -> Self {
        let state = LedgerState::new(issuer, config.issuer_initial_balance);
        info!(
            issuer = %issuer,
            reserve = config.issuer_initial_balance,
            mint_policy = ?config.mint_policy,
            "ledger created"
        );
        Self {
            issuer,
            config,
            verifier,
            state: Mutex::new(state),
        }
    }

    pub fn issuer(&self) -> Address {
        self.issuer
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Processing
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate a transaction and, if every gate passes, apply it.
    pub fn process_transaction(&self, tx: &Transaction) -> Result<Outcome> {
        let id = tx.compute_id();
        let mut state = self.state.lock();

        let result = self.run_gates(&mut state, tx, id);
        match &result {
            Ok(outcome) => {
                let stage = if tx.payload.tx_type.is_state_transition() {
                    TxStage::Applied
                } else {
                    TxStage::TypeAuthorized
                };
                debug!(tx = %id, %stage, ?outcome, "transaction accepted");
            }
            Err(err) => warn!(
                tx = %id,
                stage = %TxStage::Rejected,
                tx_type = %tx.payload.tx_type,
                from = %tx.payload.from,
                reached = %err.rejected_at().unwrap_or(TxStage::Received),
                error = %err,
                "transaction rejected"
            ),
        }
        result
    }

    fn run_gates(&self, state: &mut LedgerState, tx: &Transaction, id: TxId) -> Result<Outcome> {
        self.check_signature(tx)?;
        debug!(tx = %id, stage = %TxStage::SignatureVerified, "gate passed");

        Self::ensure_accounts(state, &tx.payload);
        debug!(tx = %id, stage = %TxStage::AccountsEnsured, "gate passed");

        let authorization = self.authorize(state, &tx.payload)?;
        debug!(tx = %id, stage = %TxStage::TypeAuthorized, "gate passed");

        let outcome = match authorization {
            Authorization::Report(report) => Outcome::BalanceReport(report),
            Authorization::Mint(plan) => {
                state.apply(plan, tx.clone(), id, tx.payload.amount);
                info!(tx = %id, to = %plan.to, amount = tx.payload.amount, "minted");
                Outcome::Minted {
                    id,
                    to: plan.to,
                    amount: tx.payload.amount,
                }
            }
            Authorization::Send(plan) => {
                state.apply(plan, tx.clone(), id, 0);
                info!(
                    tx = %id,
                    from = %plan.from,
                    to = %plan.to,
                    amount = tx.payload.amount,
                    "sent"
                );
                Outcome::Sent {
                    id,
                    from: plan.from,
                    to: plan.to,
                    amount: tx.payload.amount,
                }
            }
        };
        Ok(outcome)
    }

    /// Gate 1: the signature must recover to the claimed sender.
    fn check_signature(&self, tx: &Transaction) -> Result<()> {
        verify_transaction_signature(tx, &self.verifier)
            .map(|_| ())
            .map_err(|e| match e {
                ValidationError::Unrecoverable => LedgerError::SignatureMismatch {
                    claimed: tx.payload.from,
                    recovered: None,
                },
                ValidationError::SignatureMismatch {
                    expected,
                    recovered,
                } => LedgerError::SignatureMismatch {
                    claimed: expected,
                    recovered: Some(recovered),
                },
            })
    }

    /// Gate 2: lazily provision both parties. Never fails.
    fn ensure_accounts(state: &mut LedgerState, payload: &TxPayload) {
        for address in [payload.from, payload.to] {
            if state.ensure_account(address) {
                debug!(account = %address, "account created");
            }
        }
    }

    /// Gate 3: per-type rules.
    fn authorize(&self, state: &LedgerState, payload: &TxPayload) -> Result<Authorization> {
        match &payload.tx_type {
            TxType::Mint => self.authorize_mint(state, payload),
            TxType::Check => Ok(Self::authorize_check(state, payload)),
            TxType::Send => Self::authorize_send(state, payload),
            TxType::Unrecognized(name) => {
                Err(LedgerError::UnknownTransactionType(name.as_str().to_owned()))
            }
        }
    }

    fn authorize_mint(&self, state: &LedgerState, payload: &TxPayload) -> Result<Authorization> {
        if payload.from != self.issuer {
            return Err(LedgerError::UnauthorizedMint { from: payload.from });
        }
        let plan = state.plan_transfer(
            payload.from,
            payload.to,
            payload.amount,
            self.config.mint_policy.debits_issuer(),
        )?;
        Ok(Authorization::Mint(plan))
    }

    fn authorize_check(state: &LedgerState, payload: &TxPayload) -> Authorization {
        Authorization::Report(BalanceReport {
            address: payload.from,
            balance: state.balance(&payload.from),
        })
    }

    fn authorize_send(state: &LedgerState, payload: &TxPayload) -> Result<Authorization> {
        let balance = state.balance(&payload.from);
        if balance == 0 || balance < payload.amount {
            return Err(LedgerError::InsufficientBalance {
                address: payload.from,
                balance,
                requested: payload.amount,
            });
        }
        let plan = state.plan_transfer(payload.from, payload.to, payload.amount, true)?;
        Ok(Authorization::Send(plan))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Balance of `address`, or `None` if it has never been a participant.
    pub fn balance(&self, address: &Address) -> Option<u64> {
        self.state.lock().account(address).map(|a| a.balance)
    }

    pub fn account(&self, address: &Address) -> Option<Account> {
        self.state.lock().account(address)
    }

    /// Snapshot of every account, ordered by address.
    pub fn accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self.state.lock().accounts().copied().collect();
        accounts.sort_by_key(|a| a.address);
        accounts
    }

    /// Snapshot of the accepted transactions, in acceptance order.
    pub fn history(&self) -> Vec<Transaction> {
        self.state.lock().history().to_vec()
    }

    pub fn history_len(&self) -> usize {
        self.state.lock().history().len()
    }

    pub fn find_transaction(&self, id: &TxId) -> Option<Transaction> {
        self.state.lock().find(id).cloned()
    }

    /// Sum of every accepted mint amount.
    pub fn minted_total(&self) -> u128 {
        self.state.lock().minted_total()
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> u128 {
        self.state.lock().total_supply()
    }

    /// What `total_supply` must equal under the configured mint policy.
    pub fn expected_supply(&self) -> u128 {
        let initial = u128::from(self.config.issuer_initial_balance);
        if self.config.mint_policy.debits_issuer() {
            initial
        } else {
            initial + self.minted_total()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MintPolicy;
    use tally_core::{Ed25519Signature, Identity};

    fn setup() -> (Identity, Ledger) {
        let issuer = Identity::from_seed(&[0x01; 32]);
        let ledger = Ledger::new(issuer.address(), LedgerConfig::default());
        (issuer, ledger)
    }

    #[test]
    fn test_issuer_account_exists() {
        let (issuer, ledger) = setup();
        assert_eq!(ledger.balance(&issuer.address()), Some(1_000_000));
        assert_eq!(ledger.accounts().len(), 1);
        assert_eq!(ledger.history_len(), 0);
    }

    #[test]
    fn test_mint_debits_reserve_by_default() {
        let (issuer, ledger) = setup();
        let bob = Identity::from_seed(&[0x02; 32]);

        let tx = TxPayload::mint(issuer.address(), bob.address(), 500).sign(issuer.keypair());
        let outcome = ledger.process_transaction(&tx).unwrap();

        assert_eq!(
            outcome,
            Outcome::Minted {
                id: tx.compute_id(),
                to: bob.address(),
                amount: 500
            }
        );
        assert_eq!(ledger.balance(&issuer.address()), Some(999_500));
        assert_eq!(ledger.balance(&bob.address()), Some(500));
        assert_eq!(ledger.history_len(), 1);
        assert_eq!(ledger.total_supply(), ledger.expected_supply());
    }

    #[test]
    fn test_mint_unbounded_only_credits() {
        let issuer = Identity::from_seed(&[0x01; 32]);
        let config = LedgerConfig::default().with_mint_policy(MintPolicy::Unbounded);
        let ledger = Ledger::new(issuer.address(), config);
        let bob = Identity::from_seed(&[0x02; 32]);

        let tx = TxPayload::mint(issuer.address(), bob.address(), 500).sign(issuer.keypair());
        ledger.process_transaction(&tx).unwrap();

        assert_eq!(ledger.balance(&issuer.address()), Some(1_000_000));
        assert_eq!(ledger.balance(&bob.address()), Some(500));
        assert_eq!(ledger.minted_total(), 500);
        assert_eq!(ledger.total_supply(), 1_000_500);
        assert_eq!(ledger.expected_supply(), 1_000_500);
    }

    #[test]
    fn test_mint_beyond_reserve_rejected() {
        let issuer = Identity::from_seed(&[0x01; 32]);
        let config = LedgerConfig::default().with_issuer_balance(100);
        let ledger = Ledger::new(issuer.address(), config);
        let bob = Identity::from_seed(&[0x02; 32]);

        let tx = TxPayload::mint(issuer.address(), bob.address(), 101).sign(issuer.keypair());
        let err = ledger.process_transaction(&tx).unwrap_err();

        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(ledger.balance(&issuer.address()), Some(100));
        assert_eq!(ledger.balance(&bob.address()), Some(0));
        assert_eq!(ledger.history_len(), 0);
    }

    #[test]
    fn test_unauthorized_mint() {
        let (issuer, ledger) = setup();
        let mallory = Identity::from_seed(&[0x66; 32]);

        let tx = TxPayload::mint(mallory.address(), mallory.address(), 10).sign(mallory.keypair());
        let err = ledger.process_transaction(&tx).unwrap_err();

        assert_eq!(
            err,
            LedgerError::UnauthorizedMint {
                from: mallory.address()
            }
        );
        assert_eq!(err.rejected_at(), Some(TxStage::AccountsEnsured));
        assert_eq!(ledger.balance(&issuer.address()), Some(1_000_000));
        // Lazy provisioning survives the rejection.
        assert_eq!(ledger.balance(&mallory.address()), Some(0));
    }

    #[test]
    fn test_check_reports_without_recording() {
        let (issuer, ledger) = setup();

        let tx = TxPayload::check(issuer.address()).sign(issuer.keypair());
        let outcome = ledger.process_transaction(&tx).unwrap();

        assert_eq!(
            outcome.balance_report(),
            Some(&BalanceReport {
                address: issuer.address(),
                balance: 1_000_000
            })
        );
        assert_eq!(outcome.tx_id(), None);
        assert_eq!(ledger.history_len(), 0);
    }

    #[test]
    fn test_send_from_empty_account() {
        let (issuer, ledger) = setup();
        let bob = Identity::from_seed(&[0x02; 32]);

        // Zero amount still needs a positive balance.
        let tx = TxPayload::send(bob.address(), issuer.address(), 0).sign(bob.keypair());
        let err = ledger.process_transaction(&tx).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                address: bob.address(),
                balance: 0,
                requested: 0
            }
        );
    }

    #[test]
    fn test_send_moves_value() {
        let (issuer, ledger) = setup();
        let bob = Identity::from_seed(&[0x02; 32]);

        let tx = TxPayload::send(issuer.address(), bob.address(), 250).sign(issuer.keypair());
        let outcome = ledger.process_transaction(&tx).unwrap();

        assert!(matches!(outcome, Outcome::Sent { amount: 250, .. }));
        assert_eq!(ledger.balance(&issuer.address()), Some(999_750));
        assert_eq!(ledger.balance(&bob.address()), Some(250));
        assert_eq!(ledger.find_transaction(&tx.compute_id()), Some(tx));
    }

    #[test]
    fn test_unknown_type() {
        let (issuer, ledger) = setup();
        let tx = TxPayload::new("burn", 1, issuer.address(), issuer.address()).sign(issuer.keypair());

        let err = ledger.process_transaction(&tx).unwrap_err();
        assert_eq!(err, LedgerError::UnknownTransactionType("burn".into()));
        assert_eq!(ledger.history_len(), 0);
    }

    #[test]
    fn test_bad_signature_creates_no_accounts() {
        let (issuer, ledger) = setup();
        let bob = Identity::from_seed(&[0x02; 32]);

        let mut tx = TxPayload::send(issuer.address(), bob.address(), 1).sign(issuer.keypair());
        tx.signature.signature = Ed25519Signature::ZERO;

        let err = ledger.process_transaction(&tx).unwrap_err();
        assert_eq!(
            err,
            LedgerError::SignatureMismatch {
                claimed: issuer.address(),
                recovered: None
            }
        );
        assert_eq!(err.rejected_at(), Some(TxStage::Received));
        assert_eq!(ledger.balance(&bob.address()), None);
    }

    #[test]
    fn test_mint_named_by_string_is_a_mint() {
        let (issuer, ledger) = setup();
        let bob = Identity::from_seed(&[0x02; 32]);

        let tx = TxPayload::new("mint".to_string(), 5, issuer.address(), bob.address())
            .sign(issuer.keypair());
        let outcome = ledger.process_transaction(&tx).unwrap();

        assert!(matches!(outcome, Outcome::Minted { amount: 5, .. }));
        assert_eq!(ledger.balance(&bob.address()), Some(5));
    }
}
