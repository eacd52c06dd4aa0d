//! `StakingService` ties the contract client, the attached wallet key, and
//! the session together: it is the connection synchronizer and the only path
//! through which writes are submitted.

use alloy::primitives::{Address, U256};

use crate::config::ChainConfig;
use crate::error::{Result, WalletError};
use crate::network::{ContractClient, GlobalStats, PendingTx, TxOutcome};
use crate::session::{AccountSnapshot, Session};
use crate::wallet::WalletKey;

pub struct StakingService {
    client: ContractClient,
    session: Session,
}

impl StakingService {
    pub fn new(client: ContractClient) -> Self {
        Self {
            client,
            session: Session::new(),
        }
    }

    pub fn config(&self) -> &ChainConfig {
        self.client.config()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn connected_address(&self) -> Option<Address> {
        self.client.signer_address()
    }

    /// Attach a signing key and run a full sync.
    pub async fn connect(&mut self, key: WalletKey) -> Result<()> {
        self.client.attach_signer(key.signer())?;
        self.refresh().await
    }

    /// Detach the key and reset all cached data to defaults.
    pub fn disconnect(&mut self) {
        self.client.detach_signer();
        self.session.disconnect();
    }

    /// The connection synchronizer. No wallet: reset everything. Wrong chain:
    /// flag it and clear cached data. Otherwise re-fetch balance, stakes, and
    /// globals for the signer address; stale results from a superseded sync
    /// are discarded by the session.
    pub async fn refresh(&mut self) -> Result<()> {
        let Some(address) = self.client.signer_address() else {
            self.session.disconnect();
            return Ok(());
        };

        let actual = self
            .client
            .chain_id()
            .await
            .map_err(|e| WalletError::Network(format!("{e:#}")))?;
        if actual != self.client.config().chain_id {
            self.session.mark_wrong_chain(actual);
            return Ok(());
        }

        let ticket = self.session.begin_sync(address);
        let snapshot = self.fetch_snapshot(address).await;
        let globals = match self.client.globals().await {
            Ok(g) => Some(g),
            Err(e) => {
                log::warn!("Globals read failed, stats card hidden: {e:#}");
                None
            }
        };
        self.session.apply_sync(ticket, snapshot, globals);
        Ok(())
    }

    /// Read everything the dashboard shows. Individual read failures are
    /// logged and fall back to defaults (zero balance, empty stake list) —
    /// absence of data, never a hard error.
    async fn fetch_snapshot(&self, address: Address) -> AccountSnapshot {
        let mut snapshot = AccountSnapshot::empty(address);
        match self.client.balance_of(address).await {
            Ok(balance) => snapshot.balance = balance,
            Err(e) => log::warn!("Balance read failed, showing zero: {e:#}"),
        }
        match self.client.current_day().await {
            Ok(day) => snapshot.current_day = day,
            Err(e) => log::warn!("Current day read failed: {e:#}"),
        }
        match self.client.stakes(address).await {
            Ok(stakes) => snapshot.stakes = stakes,
            Err(e) => log::warn!("Stake list read failed, showing none: {e:#}"),
        }
        snapshot
    }

    /// Fetch global stats. Needs no wallet — this is the one read that works
    /// while disconnected.
    pub async fn fetch_globals(&mut self) -> Result<GlobalStats> {
        self.ensure_right_chain()?;
        let globals = self
            .client
            .globals()
            .await
            .map_err(|e| WalletError::Network(format!("{e:#}")))?;
        self.session.set_globals(globals.clone());
        Ok(globals)
    }

    /// Estimate yield for a prospective stake. Returns zero — without a
    /// contract call — when the amount is empty or the duration is outside
    /// the contract's bounds.
    pub async fn preview_interest(&self, amount: U256, days: u64) -> Result<U256> {
        self.ensure_right_chain()?;
        if amount.is_zero() || !self.client.config().valid_stake_days(days) {
            return Ok(U256::ZERO);
        }
        self.client
            .calculate_interest(amount, days)
            .await
            .map_err(|e| WalletError::Network(format!("{e:#}")))
    }

    /// Validate on-chain decimals against the configuration. A mismatch is a
    /// hard error; an unreachable read logs and proceeds with the configured
    /// value.
    pub async fn verify_decimals(&self) -> Result<()> {
        let configured = self.client.config().decimals;
        match self.client.token_decimals().await {
            Ok(onchain) if onchain == configured => Ok(()),
            Ok(onchain) => Err(WalletError::InvalidState(format!(
                "Contract reports {onchain} decimals but the configuration says {configured}. Refusing to render amounts with the wrong precision."
            ))),
            Err(e) => {
                log::warn!(
                    "Could not verify token decimals on-chain, using configured {configured}: {e:#}"
                );
                Ok(())
            }
        }
    }

    /// Start a new stake. Amount in base units; duration bounds are checked
    /// client-side as defense in depth — the contract stays authoritative.
    pub async fn start_stake(&mut self, amount: U256, days: u64) -> Result<TxOutcome> {
        self.ensure_connected()?;
        if amount.is_zero() {
            return Err(WalletError::InvalidAmount(
                "Cannot stake 0 OPHIR.".to_string(),
            ));
        }
        let config = self.client.config();
        if !config.valid_stake_days(days) {
            return Err(WalletError::InvalidDuration(format!(
                "Stake duration must be between {} and {} days.",
                config.min_stake_days, config.max_stake_days
            )));
        }
        let submission = self.client.submit_start_stake(amount, days);
        let outcome =
            run_transaction(&self.client, &mut self.session, "Stake start", submission).await?;
        self.refresh_after_write().await;
        Ok(outcome)
    }

    /// End a stake by list index. The stake id is resolved from the cached
    /// list; passing an explicit id that disagrees with it means the list is
    /// stale and the caller must refresh first.
    pub async fn end_stake(&mut self, index: u64, stake_id: Option<u64>) -> Result<TxOutcome> {
        self.ensure_connected()?;
        let id = self.resolve_stake_id(index, stake_id)?;
        let submission = self.client.submit_end_stake(index, id);
        let outcome =
            run_transaction(&self.client, &mut self.session, "Stake end", submission).await?;
        self.refresh_after_write().await;
        Ok(outcome)
    }

    /// Scrape accrued yield from an active stake.
    pub async fn scrape_stake(&mut self, index: u64, stake_id: Option<u64>) -> Result<TxOutcome> {
        self.ensure_connected()?;
        let id = self.resolve_stake_id(index, stake_id)?;
        let record = self
            .session
            .snapshot()
            .and_then(|s| s.stakes.iter().find(|r| r.index == index))
            .cloned();
        if let Some(record) = record {
            if record.available_to_scrape.is_zero() {
                return Err(WalletError::InvalidAmount(format!(
                    "Nothing to scrape on stake {index} yet."
                )));
            }
        }
        let submission = self.client.submit_scrape_stake(index, id);
        let outcome =
            run_transaction(&self.client, &mut self.session, "Yield scrape", submission).await?;
        self.refresh_after_write().await;
        Ok(outcome)
    }

    /// Full re-fetch after a confirmed write. The transaction already
    /// succeeded at this point, so a refresh failure is logged rather than
    /// reported as a write failure.
    async fn refresh_after_write(&mut self) {
        if let Err(e) = self.refresh().await {
            log::warn!("Post-transaction refresh failed: {e}");
        }
    }

    fn resolve_stake_id(&self, index: u64, explicit: Option<u64>) -> Result<u64> {
        let snapshot = self.session.snapshot().ok_or(WalletError::Disconnected)?;
        let record = snapshot.stakes.iter().find(|s| s.index == index);
        match (record, explicit) {
            (Some(record), None) => Ok(record.id),
            (Some(record), Some(id)) if id == record.id => Ok(id),
            (Some(record), Some(id)) => Err(WalletError::InvalidState(format!(
                "Stake id {id} does not match id {} at index {index}. Run 'refresh' and check 'stakes'.",
                record.id
            ))),
            (None, _) => Err(WalletError::InvalidState(format!(
                "No stake at index {index}. Run 'refresh' and check 'stakes'."
            ))),
        }
    }

    fn ensure_connected(&self) -> Result<()> {
        match self.session.state() {
            crate::session::ConnectionState::Connected(_) => Ok(()),
            crate::session::ConnectionState::WrongChain { actual } => {
                Err(WalletError::WrongChain {
                    expected: self.client.config().chain_id,
                    actual: *actual,
                })
            }
            crate::session::ConnectionState::Disconnected => Err(WalletError::Disconnected),
        }
    }

    fn ensure_right_chain(&self) -> Result<()> {
        if let crate::session::ConnectionState::WrongChain { actual } = self.session.state() {
            return Err(WalletError::WrongChain {
                expected: self.client.config().chain_id,
                actual: *actual,
            });
        }
        Ok(())
    }
}

/// Drive one submission through the phase machine: claim the slot, submit,
/// await confirmation. On any failure the phase records the reason and the
/// caller must not refresh — cached figures keep their pre-submission values.
async fn run_transaction(
    client: &ContractClient,
    session: &mut Session,
    action: &'static str,
    submission: impl std::future::Future<Output = anyhow::Result<PendingTx>>,
) -> Result<TxOutcome> {
    session.begin_transaction()?;

    let pending = match submission.await {
        Ok(pending) => pending,
        Err(e) => {
            let reason = format!("{e:#}");
            session.transaction_failed(reason.clone());
            return Err(WalletError::TransactionFailed(reason));
        }
    };
    session.transaction_submitted();

    match client.confirm(action, pending).await {
        Ok(outcome) => {
            session.transaction_confirmed(outcome.tx_hash.clone());
            Ok(outcome)
        }
        Err(e) => {
            let reason = format!("{e:#}");
            session.transaction_failed(reason.clone());
            Err(WalletError::TransactionFailed(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::StakeRecord;
    use alloy::primitives::address;

    const ALICE: Address = address!("1111111111111111111111111111111111111111");

    fn service() -> StakingService {
        let client = ContractClient::new(ChainConfig::default(), false).expect("client");
        StakingService::new(client)
    }

    /// Put the session into a connected state without a live RPC.
    fn force_connected(service: &mut StakingService, stakes: Vec<StakeRecord>) {
        let ticket = service.session.begin_sync(ALICE);
        let mut snapshot = AccountSnapshot::empty(ALICE);
        snapshot.balance = U256::from(500u64);
        snapshot.stakes = stakes;
        assert!(service.session.apply_sync(ticket, snapshot, None));
    }

    fn stake_record(index: u64, id: u64, available: u64) -> StakeRecord {
        StakeRecord {
            index,
            id,
            principal: U256::from(10_000_000_000u64),
            staked_days: 30,
            start_day: 100,
            unlocked_day: 130,
            last_scrape_day: 100,
            scraped_interest: U256::ZERO,
            available_to_scrape: U256::from(available),
        }
    }

    #[tokio::test]
    async fn preview_is_zero_outside_bounds() {
        let service = service();
        let amount = U256::from(100_000_000u64);
        // None of these may touch the network.
        assert_eq!(service.preview_interest(amount, 0).await.unwrap(), U256::ZERO);
        assert_eq!(
            service.preview_interest(amount, 8358).await.unwrap(),
            U256::ZERO
        );
        assert_eq!(
            service.preview_interest(U256::ZERO, 30).await.unwrap(),
            U256::ZERO
        );
    }

    #[tokio::test]
    async fn writes_require_connection() {
        let mut service = service();
        assert!(matches!(
            service.start_stake(U256::from(1u64), 30).await,
            Err(WalletError::Disconnected)
        ));
        assert!(matches!(
            service.end_stake(0, None).await,
            Err(WalletError::Disconnected)
        ));
    }

    #[tokio::test]
    async fn wrong_chain_blocks_reads_and_writes() {
        let mut service = service();
        service.session.mark_wrong_chain(1);
        assert!(matches!(
            service.start_stake(U256::from(1u64), 30).await,
            Err(WalletError::WrongChain { expected: 369, actual: 1 })
        ));
        assert!(matches!(
            service.preview_interest(U256::from(1u64), 30).await,
            Err(WalletError::WrongChain { .. })
        ));
        assert!(matches!(
            service.fetch_globals().await,
            Err(WalletError::WrongChain { .. })
        ));
    }

    #[tokio::test]
    async fn start_stake_validates_before_submitting() {
        let mut service = service();
        force_connected(&mut service, vec![]);

        assert!(matches!(
            service.start_stake(U256::ZERO, 30).await,
            Err(WalletError::InvalidAmount(_))
        ));
        assert!(matches!(
            service.start_stake(U256::from(1u64), 0).await,
            Err(WalletError::InvalidDuration(_))
        ));
        assert!(matches!(
            service.start_stake(U256::from(1u64), 9000).await,
            Err(WalletError::InvalidDuration(_))
        ));
        // Validation failures never claim the transaction slot.
        assert!(!service.session.tx_phase().is_pending());
    }

    #[tokio::test]
    async fn pending_transaction_rejects_second_submission() {
        let mut service = service();
        force_connected(&mut service, vec![stake_record(0, 7, 0)]);
        service.session.begin_transaction().expect("slot free");

        assert!(matches!(
            service.start_stake(U256::from(1u64), 30).await,
            Err(WalletError::TransactionPending(_))
        ));
    }

    #[tokio::test]
    async fn end_stake_rejects_unknown_index_and_stale_id() {
        let mut service = service();
        force_connected(&mut service, vec![stake_record(0, 7, 0)]);

        assert!(matches!(
            service.end_stake(3, None).await,
            Err(WalletError::InvalidState(_))
        ));
        assert!(matches!(
            service.end_stake(0, Some(99)).await,
            Err(WalletError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn scrape_refuses_when_nothing_available() {
        let mut service = service();
        force_connected(&mut service, vec![stake_record(0, 7, 0)]);
        assert!(matches!(
            service.scrape_stake(0, None).await,
            Err(WalletError::InvalidAmount(_))
        ));
    }

    #[tokio::test]
    async fn failed_submission_leaves_cached_state_unchanged() {
        let mut service = service();
        force_connected(&mut service, vec![stake_record(0, 7, 5)]);
        let before = service.session.snapshot().cloned().expect("snapshot");

        // No signing key is attached to the client, so submission fails
        // before reaching the network.
        let result = service.end_stake(0, None).await;
        assert!(matches!(result, Err(WalletError::TransactionFailed(_))));

        // No refresh ran; balance and stakes keep their pre-submission values.
        assert_eq!(service.session.snapshot(), Some(&before));
        assert!(matches!(
            service.session.tx_phase(),
            crate::session::TxPhase::Failed { .. }
        ));
        // The slot is free again for a retry.
        assert!(!service.session.tx_phase().is_pending());
    }

    #[test]
    fn disconnect_resets_session() {
        let mut service = service();
        force_connected(&mut service, vec![stake_record(0, 7, 0)]);
        service.disconnect();
        assert!(service.session.snapshot().is_none());
        assert!(service.session.globals().is_none());
        assert!(service.connected_address().is_none());
    }
}
