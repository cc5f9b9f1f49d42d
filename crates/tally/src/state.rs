//! Account balances and transaction history.
//!
//! `LedgerState` is the unlocked interior of a [`Ledger`](crate::Ledger). It
//! never validates anything itself; the pipeline decides, the state records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tally_core::{Address, Transaction, TxId};

use crate::error::{LedgerError, Result};

/// An account and its balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    pub balance: u64,
}

impl Account {
    pub fn new(address: Address, balance: u64) -> Self {
        Self { address, balance }
    }
}

/// New balances for both parties of an authorized mint or send.
///
/// Computed before anything is written, so applying it cannot fail halfway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TransferPlan {
    pub from: Address,
    pub to: Address,
    pub from_after: u64,
    pub to_after: u64,
}

#[derive(Debug)]
pub(crate) struct LedgerState {
    accounts: HashMap<Address, Account>,
    history: Vec<Transaction>,
    /// History index by transaction ID.
    index: HashMap<TxId, usize>,
    /// Sum of every accepted mint amount.
    minted_total: u128,
}

impl LedgerState {
    /// Create the state with the issuer account already funded.
    pub fn new(issuer: Address, issuer_balance: u64) -> Self {
        let mut accounts = HashMap::new();
        accounts.insert(issuer, Account::new(issuer, issuer_balance));
        Self {
            accounts,
            history: Vec::new(),
            index: HashMap::new(),
            minted_total: 0,
        }
    }

    /// Create a zero-balance account for `address` if it has none.
    ///
    /// Returns whether an account was created. Accounts created here persist
    /// even if the transaction that caused them is later rejected.
    pub fn ensure_account(&mut self, address: Address) -> bool {
        if self.accounts.contains_key(&address) {
            return false;
        }
        self.accounts.insert(address, Account::new(address, 0));
        true
    }

    /// Balance of `address`, zero if it has no account.
    pub fn balance(&self, address: &Address) -> u64 {
        self.accounts.get(address).map_or(0, |a| a.balance)
    }

    pub fn account(&self, address: &Address) -> Option<Account> {
        self.accounts.get(address).copied()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    pub fn find(&self, id: &TxId) -> Option<&Transaction> {
        self.index.get(id).and_then(|&i| self.history.get(i))
    }

    pub fn minted_total(&self) -> u128 {
        self.minted_total
    }

    pub fn total_supply(&self) -> u128 {
        self.accounts.values().map(|a| u128::from(a.balance)).sum()
    }

    /// Work out the balances after moving `amount` from `from` to `to`.
    ///
    /// With `debit_from` unset only `to` is credited. The caller has already
    /// checked that `from` can cover a debit.
    pub fn plan_transfer(
        &self,
        from: Address,
        to: Address,
        amount: u64,
        debit_from: bool,
    ) -> Result<TransferPlan> {
        let from_balance = self.balance(&from);
        let after_debit = if debit_from {
            from_balance
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientBalance {
                    address: from,
                    balance: from_balance,
                    requested: amount,
                })?
        } else {
            from_balance
        };

        // A self-transfer credits the balance it was just debited from.
        let to_base = if from == to {
            after_debit
        } else {
            self.balance(&to)
        };
        let to_after = to_base
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { address: to })?;
        let from_after = if from == to { to_after } else { after_debit };

        Ok(TransferPlan {
            from,
            to,
            from_after,
            to_after,
        })
    }

    /// Write a planned transfer and append the transaction to history.
    pub fn apply(&mut self, plan: TransferPlan, tx: Transaction, id: TxId, minted: u64) {
        self.set_balance(plan.from, plan.from_after);
        self.set_balance(plan.to, plan.to_after);
        self.minted_total += u128::from(minted);
        self.index.insert(id, self.history.len());
        self.history.push(tx);
    }

    fn set_balance(&mut self, address: Address, balance: u64) {
        self.accounts
            .entry(address)
            .and_modify(|a| a.balance = balance)
            .or_insert_with(|| Account::new(address, balance));
    }
}
