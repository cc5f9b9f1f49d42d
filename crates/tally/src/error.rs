//! Error types for the Ledger.

use tally_core::Address;
use thiserror::Error;

use crate::stage::TxStage;

/// Reasons a transaction is rejected, plus configuration failures.
///
/// Every rejection is an expected outcome of submitting a bad transaction;
/// none of them leave the ledger in an inconsistent state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The signature does not recover to the claimed sender.
    #[error("signature mismatch: transaction claims {claimed}, recovered {}", display_recovered(.recovered))]
    SignatureMismatch {
        claimed: Address,
        recovered: Option<Address>,
    },

    /// A mint submitted by anyone other than the issuer.
    #[error("unauthorized mint from {from}")]
    UnauthorizedMint { from: Address },

    /// The debited account cannot cover the amount.
    #[error("insufficient balance in {address}: have {balance}, need {requested}")]
    InsufficientBalance {
        address: Address,
        balance: u64,
        requested: u64,
    },

    /// The transaction type is not one the ledger knows.
    #[error("unknown transaction type: {0:?}")]
    UnknownTransactionType(String),

    /// Crediting the amount would overflow the recipient's balance.
    #[error("balance overflow crediting {address}")]
    BalanceOverflow { address: Address },

    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LedgerError {
    /// The last stage a rejected transaction reached before failing.
    ///
    /// `None` for errors that are not transaction rejections.
    pub fn rejected_at(&self) -> Option<TxStage> {
        match self {
            LedgerError::SignatureMismatch { .. } => Some(TxStage::Received),
            LedgerError::UnauthorizedMint { .. }
            | LedgerError::InsufficientBalance { .. }
            | LedgerError::UnknownTransactionType(_)
            | LedgerError::BalanceOverflow { .. } => Some(TxStage::AccountsEnsured),
            LedgerError::Config(_) => None,
        }
    }
}

fn display_recovered(recovered: &Option<Address>) -> String {
    match recovered {
        Some(addr) => addr.to_string(),
        None => "nothing".to_string(),
    }
}

/// Result type for Ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
