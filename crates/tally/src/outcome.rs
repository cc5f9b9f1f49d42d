//! What the ledger hands back for an accepted transaction.

use serde::{Deserialize, Serialize};
use tally_core::{Address, TxId};

/// Read-only answer to a `check` transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub address: Address,
    pub balance: u64,
}

/// Result of a transaction that passed every gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A mint was applied and recorded.
    Minted { id: TxId, to: Address, amount: u64 },
    /// A send was applied and recorded.
    Sent {
        id: TxId,
        from: Address,
        to: Address,
        amount: u64,
    },
    /// A balance query was answered. Nothing was recorded.
    BalanceReport(BalanceReport),
}

impl Outcome {
    /// The ID of the recorded transaction, if one was recorded.
    pub fn tx_id(&self) -> Option<TxId> {
        match self {
            Outcome::Minted { id, .. } | Outcome::Sent { id, .. } => Some(*id),
            Outcome::BalanceReport(_) => None,
        }
    }

    pub fn balance_report(&self) -> Option<&BalanceReport> {
        match self {
            Outcome::BalanceReport(report) => Some(report),
            _ => None,
        }
    }
}
