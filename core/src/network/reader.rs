use alloy::primitives::{Address, U256};
use anyhow::Result;

use super::types::{GlobalStats, StakeRecord};
use super::ContractClient;

/// Clamp a contract uint256 into a u64 day/count field.
fn to_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

impl ContractClient {
    /// Query the OPHIR balance for an address, in base units.
    pub async fn balance_of(&self, address: Address) -> Result<U256> {
        let contract = self.reader_contract();
        self.timed("Balance query", contract.balanceOf(address).call())
            .await
    }

    /// The contract's current day counter.
    pub async fn current_day(&self) -> Result<u64> {
        let contract = self.reader_contract();
        let day = self
            .timed("Current day query", contract.currentDay().call())
            .await?;
        Ok(to_u64(day))
    }

    /// Number of stake records the contract holds for an address.
    pub async fn stake_count(&self, address: Address) -> Result<u64> {
        let contract = self.reader_contract();
        let count = self
            .timed("Stake count query", contract.countStakes(address).call())
            .await?;
        Ok(to_u64(count))
    }

    /// Read a single stake record by index. `current_day` bounds the
    /// available-to-scrape window.
    pub async fn stake_at(
        &self,
        address: Address,
        index: u64,
        current_day: u64,
    ) -> Result<StakeRecord> {
        let contract = self.reader_contract();
        let raw = self
            .timed(
                "Stake record query",
                contract.Stakes(address, U256::from(index)).call(),
            )
            .await?;

        let start_day = to_u64(raw.startDay);
        let staked_days = to_u64(raw.stakedDays);
        let unlocked_day = start_day.saturating_add(staked_days);
        let last_scrape_day = to_u64(raw.lastScrape);

        // Yield is scrapeable only while the stake is active; the window runs
        // from the last scrape (or start) to today, capped at maturity.
        let scrape_days = current_day.min(unlocked_day).saturating_sub(last_scrape_day);
        let available_to_scrape = if current_day >= unlocked_day || scrape_days == 0 {
            U256::ZERO
        } else {
            self.calculate_interest(raw.stakedPrinciple, scrape_days)
                .await?
        };

        Ok(StakeRecord {
            index,
            id: raw.stakeId.to::<u64>(),
            principal: raw.stakedPrinciple,
            staked_days,
            start_day,
            unlocked_day,
            last_scrape_day,
            scraped_interest: raw.scrapedInterest,
            available_to_scrape,
        })
    }

    /// Read the full stake list for an address, one call per index.
    /// The contract exposes no batch accessor.
    pub async fn stakes(&self, address: Address) -> Result<Vec<StakeRecord>> {
        let current_day = self.current_day().await?;
        let count = self.stake_count(address).await?;
        let mut records = Vec::with_capacity(count as usize);
        for index in 0..count {
            records.push(self.stake_at(address, index, current_day).await?);
        }
        Ok(records)
    }

    /// Single aggregate read of the contract's global accounting.
    /// Works without an attached wallet.
    pub async fn globals(&self) -> Result<GlobalStats> {
        let contract = self.reader_contract();
        let raw = self
            .timed("Globals query", contract.reportGlobals().call())
            .await?;
        Ok(GlobalStats {
            current_day: to_u64(raw.current_day),
            total_staked: raw.staked_stars,
            charity_pool: raw.penalized_stars,
            endowment: raw.endowment_supply,
        })
    }

    /// Pure view call estimating yield for `amount` staked over `days`.
    pub async fn calculate_interest(&self, amount: U256, days: u64) -> Result<U256> {
        let contract = self.reader_contract();
        self.timed(
            "Interest preview query",
            contract.calculateInterest(amount, U256::from(days)).call(),
        )
        .await
    }
}
