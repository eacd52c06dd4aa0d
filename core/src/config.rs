//! Chain and contract configuration.
//!
//! Everything that varies per deployment lives in one `ChainConfig`: chain id,
//! RPC endpoint, contract address, token decimals, and the contract's staking
//! duration bounds. The displayed decimals are verified against the deployed
//! contract's `decimals()` at startup instead of being hard-coded per view.

use std::time::Duration;

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// PulseChain mainnet chain id — the only supported network.
pub const PULSECHAIN_ID: u64 = 369;

/// Public PulseChain RPC endpoint.
pub const PULSECHAIN_RPC: &str = "https://rpc.pulsechain.com";

/// Block explorer, shown alongside transaction hashes.
pub const PULSECHAIN_EXPLORER: &str = "https://scan.pulsechain.com";

/// The deployed OPHIR staking contract.
pub const OPHIR_CONTRACT: Address = address!("c59be55d22cb7967ee95e5be0770e263ee014f78");

/// OPHIR amounts use 8 decimal places on-chain.
pub const OPHIR_DECIMALS: u8 = 8;

/// Contract-enforced staking duration bounds, in days.
pub const MIN_STAKE_DAYS: u64 = 1;
pub const MAX_STAKE_DAYS: u64 = 8357;

/// Default timeout applied to every RPC call so a hung provider cannot
/// hang a refresh indefinitely.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub rpc_url: String,
    pub contract: Address,
    pub decimals: u8,
    pub min_stake_days: u64,
    pub max_stake_days: u64,
    #[serde(skip, default = "default_timeout")]
    pub rpc_timeout: Duration,
}

fn default_timeout() -> Duration {
    DEFAULT_RPC_TIMEOUT
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: PULSECHAIN_ID,
            rpc_url: PULSECHAIN_RPC.to_string(),
            contract: OPHIR_CONTRACT,
            decimals: OPHIR_DECIMALS,
            min_stake_days: MIN_STAKE_DAYS,
            max_stake_days: MAX_STAKE_DAYS,
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
        }
    }
}

impl ChainConfig {
    /// Default config pointed at a different RPC endpoint.
    pub fn with_rpc_url(url: impl Into<String>) -> Self {
        Self {
            rpc_url: url.into(),
            ..Self::default()
        }
    }

    /// Whether a staking duration falls within the contract's bounds.
    pub fn valid_stake_days(&self, days: u64) -> bool {
        (self.min_stake_days..=self.max_stake_days).contains(&days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_pulsechain() {
        let config = ChainConfig::default();
        assert_eq!(config.chain_id, 369);
        assert_eq!(config.decimals, 8);
        assert_eq!(config.rpc_url, "https://rpc.pulsechain.com");
    }

    #[test]
    fn stake_day_bounds() {
        let config = ChainConfig::default();
        assert!(!config.valid_stake_days(0));
        assert!(config.valid_stake_days(1));
        assert!(config.valid_stake_days(30));
        assert!(config.valid_stake_days(8357));
        assert!(!config.valid_stake_days(8358));
    }

    #[test]
    fn custom_rpc_keeps_contract_constants() {
        let config = ChainConfig::with_rpc_url("https://rpc-pulsechain.g4mm4.io");
        assert_eq!(config.contract, OPHIR_CONTRACT);
        assert_eq!(config.chain_id, PULSECHAIN_ID);
    }
}
