/// Thin wrapper around an alloy HTTP provider for OPHIR contract operations.
mod reader;
mod types;
mod writer;

pub use types::*;
pub use writer::PendingTx;

use std::future::IntoFuture;

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use anyhow::{bail, Context, Result};

use crate::config::ChainConfig;

sol! {
    /// The fixed OPHIR staking contract surface. One ABI, defined once —
    /// the deployed contract is authoritative for all accounting.
    #[sol(rpc)]
    contract OphirStaking {
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
        function currentDay() external view returns (uint256);
        function countStakes(address staker) external view returns (uint256);
        function Stakes(address staker, uint256 index) external view returns (
            uint40 stakeId,
            uint256 stakedPrinciple,
            uint256 stakedDays,
            uint256 startDay,
            uint256 lastScrape,
            uint256 scrapedInterest
        );
        function calculateInterest(uint256 amount, uint256 numDays) external view returns (uint256);
        function reportGlobals() external view returns (
            uint256 current_day,
            uint256 staked_stars,
            uint256 penalized_stars,
            uint256 endowment_supply
        );
        function startStake(uint256 amount, uint256 numDays) external;
        function endStake(uint256 stakeIndex, uint40 stakeId) external;
        function scrapeStake(uint256 stakeIndex, uint40 stakeId) external;
    }
}

pub(super) type OphirInstance = OphirStaking::OphirStakingInstance<DynProvider>;

/// Write-capable provider plus the signer address it fills `from` with.
pub(super) struct WalletHandle {
    pub(super) address: Address,
    pub(super) provider: DynProvider,
}

pub struct ContractClient {
    pub(super) config: ChainConfig,
    /// Read-only provider on the public endpoint; works without a wallet.
    pub(super) provider: DynProvider,
    pub(super) wallet: Option<WalletHandle>,
}

/// Reject non-HTTPS node URLs unless `allow_insecure` is set.
fn validate_node_url(url: &str, allow_insecure: bool) -> Result<()> {
    if url.starts_with("https://") {
        return Ok(());
    }
    if url.starts_with("http://") {
        if allow_insecure {
            return Ok(());
        }
        bail!("Refusing to connect over plain HTTP: {url}\nUse --insecure to allow unencrypted connections.");
    }
    bail!("Invalid node URL scheme: {url}\nExpected an https:// URL.");
}

impl ContractClient {
    pub fn new(config: ChainConfig, allow_insecure: bool) -> Result<Self> {
        validate_node_url(&config.rpc_url, allow_insecure)?;
        let url = config
            .rpc_url
            .parse()
            .with_context(|| format!("Invalid node URL: {}", config.rpc_url))?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(Self {
            config,
            provider,
            wallet: None,
        })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Attach a signing key. Builds a wallet-filled provider on the same
    /// endpoint so writes carry the signer's `from` and signature.
    pub fn attach_signer(&mut self, signer: PrivateKeySigner) -> Result<()> {
        let address = signer.address();
        let url = self
            .config
            .rpc_url
            .parse()
            .with_context(|| format!("Invalid node URL: {}", self.config.rpc_url))?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();
        self.wallet = Some(WalletHandle { address, provider });
        Ok(())
    }

    /// Drop the signing key. Read-only operations keep working.
    pub fn detach_signer(&mut self) {
        self.wallet = None;
    }

    pub fn signer_address(&self) -> Option<Address> {
        self.wallet.as_ref().map(|w| w.address)
    }

    /// The chain id the RPC endpoint actually serves.
    pub async fn chain_id(&self) -> Result<u64> {
        self.timed("Chain id query", self.provider.get_chain_id())
            .await
    }

    /// The token's on-chain `decimals()`. Compared against the configured
    /// value at startup.
    pub async fn token_decimals(&self) -> Result<u8> {
        let contract = self.reader_contract();
        self.timed("Decimals query", contract.decimals().call())
            .await
    }

    pub(super) fn reader_contract(&self) -> OphirInstance {
        OphirStaking::new(self.config.contract, self.provider.clone())
    }

    pub(super) fn writer_contract(&self) -> Result<(Address, OphirInstance)> {
        let wallet = self
            .wallet
            .as_ref()
            .context("No wallet attached; connect a signing key first")?;
        Ok((
            wallet.address,
            OphirStaking::new(self.config.contract, wallet.provider.clone()),
        ))
    }

    /// Run an RPC future under the configured timeout. A hung provider call
    /// surfaces as an error instead of hanging the refresh.
    pub(super) async fn timed<T, E>(
        &self,
        what: &str,
        fut: impl IntoFuture<Output = std::result::Result<T, E>>,
    ) -> Result<T>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match tokio::time::timeout(self.config.rpc_timeout, fut.into_future()).await {
            Ok(result) => result.with_context(|| format!("{what} failed")),
            Err(_) => bail!(
                "{what} timed out after {}s",
                self.config.rpc_timeout.as_secs()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_http_url_without_insecure() {
        let config = ChainConfig::with_rpc_url("http://localhost:8545");
        let err = ContractClient::new(config, false).err().expect("should fail");
        assert!(err.to_string().contains("--insecure"));
    }

    #[test]
    fn accepts_http_url_with_insecure() {
        let config = ChainConfig::with_rpc_url("http://localhost:8545");
        assert!(ContractClient::new(config, true).is_ok());
    }

    #[test]
    fn rejects_invalid_url_scheme() {
        let config = ChainConfig::with_rpc_url("ws://rpc.pulsechain.com");
        let err = ContractClient::new(config, false).err().expect("should fail");
        assert!(err.to_string().contains("Invalid node URL scheme"));
    }

    #[test]
    fn default_client_has_no_signer() {
        let client = ContractClient::new(ChainConfig::default(), false).expect("client");
        assert!(client.signer_address().is_none());
        assert!(client.writer_contract().is_err());
    }
}
