use alloy::primitives::U256;

/// Outcome of a confirmed state-changing contract call.
#[derive(Debug, Clone)]
pub struct TxOutcome {
    pub tx_hash: String,
    pub status: String,
    pub gas_used: u64,
    pub block_number: Option<u64>,
}

/// One staking position, read verbatim from the contract.
/// Never mutated locally — always re-fetched after a write.
#[derive(Debug, Clone, PartialEq)]
pub struct StakeRecord {
    /// Position in the staker's on-chain stake list. Required (together with
    /// the id) when ending or scraping.
    pub index: u64,
    /// The contract's uint40 stake id.
    pub id: u64,
    /// Principal in base units (8 decimals).
    pub principal: U256,
    pub staked_days: u64,
    pub start_day: u64,
    /// Day the stake matures: `start_day + staked_days`.
    pub unlocked_day: u64,
    /// Day of the last yield scrape; equals `start_day` if never scraped.
    pub last_scrape_day: u64,
    /// Total yield scraped so far, in base units.
    pub scraped_interest: U256,
    /// Yield currently claimable via scrape, in base units. Derived from the
    /// contract's interest view over the elapsed scrape window.
    pub available_to_scrape: U256,
}

impl StakeRecord {
    pub fn status(&self, current_day: u64) -> StakeStatus {
        if current_day >= self.unlocked_day {
            StakeStatus::Mature
        } else {
            StakeStatus::Active
        }
    }

    pub fn has_scraped(&self) -> bool {
        self.last_scrape_day != self.start_day
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StakeStatus {
    Active,
    Mature,
}

impl std::fmt::Display for StakeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Mature => write!(f, "Mature (full payout)"),
        }
    }
}

/// Snapshot of the contract's global accounting, from a single
/// `reportGlobals` aggregate read.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalStats {
    pub current_day: u64,
    /// Total currently staked, in base units.
    pub total_staked: U256,
    /// Accumulated penalty pool earmarked for charity, in base units.
    pub charity_pool: U256,
    /// Endowment supply, in base units.
    pub endowment: U256,
}
