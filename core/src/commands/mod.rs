/// Command definitions and parsing for the wallet REPL and one-shot mode.
mod execute;
mod help;
mod parse;

pub use help::help_text;

use alloy::primitives::U256;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Show OPHIR balance for the connected address
    Balance,
    /// Show the connected wallet address
    Address,
    /// Show the stake list
    Stakes,
    /// Show global network stats (works without a wallet)
    Globals,
    /// Show connection state, contract, and node info
    Status,
    /// Re-check the chain and re-fetch all displayed state
    Refresh,
    /// Estimate yield: preview <amount> <days>
    Preview { amount: U256, days: u64, raw_amount: String },
    /// Start a stake: stake <amount> <days>
    Stake { amount: U256, days: u64, raw_amount: String },
    /// End a stake: end <index> [stake_id]
    EndStake { index: u64, stake_id: Option<u64> },
    /// Scrape accrued yield: scrape <index> [stake_id]
    Scrape { index: u64, stake_id: Option<u64> },
    /// Attach a wallet key (interactive shell only)
    Connect,
    /// Detach the wallet key and clear cached data
    Disconnect,
    /// Print help
    Help { command: Option<String> },
    /// Exit the wallet
    Exit,
}

impl Command {
    /// Returns a confirmation prompt if this command should ask before executing.
    pub fn confirmation_prompt(&self) -> Option<String> {
        match self {
            Command::Stake { raw_amount, days, .. } => Some(format!(
                "Stake {raw_amount} OPHIR for {days} days?"
            )),
            Command::EndStake { index, .. } => Some(format!(
                "End stake at index {index}? Ending before maturity is penalized by the contract."
            )),
            Command::Scrape { index, .. } => Some(format!(
                "Scrape accrued yield from stake at index {index}? Scraping is penalized by the contract."
            )),
            Command::Disconnect => Some("Disconnect and clear all cached data?".to_string()),
            _ => None,
        }
    }
}
