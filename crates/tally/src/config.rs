//! Ledger configuration.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// Balance the issuer account starts with.
pub const DEFAULT_ISSUER_BALANCE: u64 = 1_000_000;

/// How a mint affects the issuer's own balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MintPolicy {
    /// Minting transfers out of the issuer's reserve: the issuer is debited,
    /// the recipient credited. Total supply stays at the initial issuer
    /// balance, and a mint larger than the reserve is rejected.
    #[default]
    FromReserve,

    /// Minting only credits the recipient. Total supply grows by every
    /// accepted mint.
    Unbounded,
}

impl MintPolicy {
    /// Whether a mint debits the issuer.
    pub fn debits_issuer(self) -> bool {
        matches!(self, MintPolicy::FromReserve)
    }
}

/// Configuration for the Ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Opening balance of the issuer account.
    pub issuer_initial_balance: u64,
    /// Mint accounting.
    pub mint_policy: MintPolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            issuer_initial_balance: DEFAULT_ISSUER_BALANCE,
            mint_policy: MintPolicy::default(),
        }
    }
}

impl LedgerConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LedgerError::Config(e.to_string()))
    }

    pub fn with_issuer_balance(mut self, balance: u64) -> Self {
        self.issuer_initial_balance = balance;
        self
    }

    pub fn with_mint_policy(mut self, policy: MintPolicy) -> Self {
        self.mint_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.issuer_initial_balance, 1_000_000);
        assert_eq!(config.mint_policy, MintPolicy::FromReserve);
        assert!(config.mint_policy.debits_issuer());
    }

    #[test]
    fn test_from_json_partial() {
        let config = LedgerConfig::from_json(r#"{"mint_policy":"unbounded"}"#).unwrap();
        assert_eq!(config.mint_policy, MintPolicy::Unbounded);
        assert_eq!(config.issuer_initial_balance, DEFAULT_ISSUER_BALANCE);

        let config = LedgerConfig::from_json("{}").unwrap();
        assert_eq!(config, LedgerConfig::default());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let result = LedgerConfig::from_json(r#"{"mint_policy":"printer"}"#);
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }
}
