use std::time::Duration;

use alloy::network::Ethereum;
use alloy::primitives::aliases::U40;
use alloy::primitives::U256;
use alloy::providers::PendingTransactionBuilder;
use anyhow::{bail, Context, Result};

use super::types::TxOutcome;
use super::ContractClient;

/// Confirmation can take several blocks; give it longer than a plain read.
const CONFIRM_TIMEOUT: Duration = Duration::from_secs(180);

/// A submitted but not yet confirmed transaction.
pub type PendingTx = PendingTransactionBuilder<Ethereum>;

impl ContractClient {
    /// Submit a `startStake` transaction. Amount is in base units.
    pub async fn submit_start_stake(&self, amount: U256, days: u64) -> Result<PendingTx> {
        let (_, contract) = self.writer_contract()?;
        self.timed(
            "Stake submission",
            contract.startStake(amount, U256::from(days)).send(),
        )
        .await
    }

    /// Submit an `endStake` transaction. Takes both the list index and the
    /// uint40 stake id, in that order.
    pub async fn submit_end_stake(&self, index: u64, stake_id: u64) -> Result<PendingTx> {
        let (_, contract) = self.writer_contract()?;
        self.timed(
            "Stake end submission",
            contract
                .endStake(U256::from(index), U40::from(stake_id))
                .send(),
        )
        .await
    }

    /// Submit a `scrapeStake` transaction.
    pub async fn submit_scrape_stake(&self, index: u64, stake_id: u64) -> Result<PendingTx> {
        let (_, contract) = self.writer_contract()?;
        self.timed(
            "Scrape submission",
            contract
                .scrapeStake(U256::from(index), U40::from(stake_id))
                .send(),
        )
        .await
    }

    /// Wait for a submitted transaction's receipt and turn it into a typed
    /// outcome. A receipt with failure status is an error, not a result —
    /// callers must not refresh state on it.
    pub async fn confirm(&self, action: &str, pending: PendingTx) -> Result<TxOutcome> {
        let receipt = match tokio::time::timeout(CONFIRM_TIMEOUT, pending.get_receipt()).await {
            Ok(result) => result.with_context(|| format!("{action}: confirmation failed"))?,
            Err(_) => bail!(
                "{action}: confirmation timed out after {}s. Check the transaction on the explorer before retrying.",
                CONFIRM_TIMEOUT.as_secs()
            ),
        };

        let tx_hash = format!("{:#x}", receipt.transaction_hash);
        if !receipt.status() {
            bail!("{action} reverted on-chain (tx {tx_hash}). No balance or stake was changed.");
        }

        Ok(TxOutcome {
            tx_hash,
            status: "confirmed".to_string(),
            gas_used: receipt.gas_used,
            block_number: receipt.block_number,
        })
    }
}
