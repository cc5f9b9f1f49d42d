//! Processing stages a transaction moves through.
//!
//! ```text
//! Received -> SignatureVerified -> AccountsEnsured -> TypeAuthorized -> Applied
//!     \               \                   \                  \
//!      +---------------+-------------------+------------------+--> Rejected
//! ```
//!
//! `Applied` and `Rejected` are terminal. A `check` transaction ends at
//! `TypeAuthorized`: it is answered, never applied.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStage {
    Received,
    SignatureVerified,
    AccountsEnsured,
    TypeAuthorized,
    Applied,
    Rejected,
}

impl TxStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, TxStage::Applied | TxStage::Rejected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TxStage::Received => "received",
            TxStage::SignatureVerified => "signature_verified",
            TxStage::AccountsEnsured => "accounts_ensured",
            TxStage::TypeAuthorized => "type_authorized",
            TxStage::Applied => "applied",
            TxStage::Rejected => "rejected",
        }
    }
}

impl fmt::Display for TxStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_stages() {
        assert!(TxStage::Applied.is_terminal());
        assert!(TxStage::Rejected.is_terminal());
        assert!(!TxStage::TypeAuthorized.is_terminal());
        assert!(!TxStage::Received.is_terminal());
    }

    #[test]
    fn test_serde_matches_display() {
        let json = serde_json::to_string(&TxStage::SignatureVerified).unwrap();
        assert_eq!(json, format!("\"{}\"", TxStage::SignatureVerified));
    }
}
