//! In-memory session state: connection state machine, cached contract reads,
//! sync staleness tickets, and the pending-transaction guard.
//!
//! The session never holds authoritative data. Every numeric field is
//! overwritten wholesale by the next completed sync; nothing is mutated in
//! place after a write.

use alloy::primitives::{Address, U256};

use crate::error::{Result, WalletError};
use crate::network::{GlobalStats, StakeRecord};

/// Everything the dashboard shows for the connected account, captured by one
/// sync pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub address: Address,
    /// Balance in base units; zero when the read soft-failed.
    pub balance: U256,
    pub current_day: u64,
    pub stakes: Vec<StakeRecord>,
}

impl AccountSnapshot {
    pub fn empty(address: Address) -> Self {
        Self {
            address,
            balance: U256::ZERO,
            current_day: 0,
            stakes: Vec::new(),
        }
    }
}

/// Exactly one of these holds at any time; each maps to exactly one screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    Disconnected,
    WrongChain { actual: u64 },
    Connected(AccountSnapshot),
}

/// Top-level screen derived from the connection state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    ConnectPrompt,
    WrongChainNotice,
    Dashboard,
}

/// Lifecycle of a state-changing submission. While a transaction is
/// `Submitting` or `Confirming`, no second submission is accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum TxPhase {
    Idle,
    Submitting,
    Confirming,
    Done { tx_hash: String },
    Failed { reason: String },
}

impl TxPhase {
    pub fn is_pending(&self) -> bool {
        matches!(self, TxPhase::Submitting | TxPhase::Confirming)
    }

    fn describe(&self) -> &'static str {
        match self {
            TxPhase::Submitting => "being submitted",
            TxPhase::Confirming => "awaiting confirmation",
            _ => "idle",
        }
    }
}

impl std::fmt::Display for TxPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxPhase::Idle => write!(f, "idle"),
            TxPhase::Submitting => write!(f, "submitting"),
            TxPhase::Confirming => write!(f, "confirming"),
            TxPhase::Done { tx_hash } => write!(f, "done ({tx_hash})"),
            TxPhase::Failed { reason } => write!(f, "failed ({reason})"),
        }
    }
}

/// Ticket issued when a sync pass starts. Results are applied only if the
/// ticket is still the latest — syncs superseded by a newer pass, a
/// disconnect, or a chain change are discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncTicket {
    generation: u64,
    address: Address,
}

impl SyncTicket {
    pub fn address(&self) -> Address {
        self.address
    }
}

#[derive(Debug)]
pub struct Session {
    state: ConnectionState,
    globals: Option<GlobalStats>,
    tx_phase: TxPhase,
    sync_generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            globals: None,
            tx_phase: TxPhase::Idle,
            sync_generation: 0,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn globals(&self) -> Option<&GlobalStats> {
        self.globals.as_ref()
    }

    pub fn tx_phase(&self) -> &TxPhase {
        &self.tx_phase
    }

    pub fn screen(&self) -> Screen {
        match self.state {
            ConnectionState::Disconnected => Screen::ConnectPrompt,
            ConnectionState::WrongChain { .. } => Screen::WrongChainNotice,
            ConnectionState::Connected(_) => Screen::Dashboard,
        }
    }

    pub fn connected_address(&self) -> Option<Address> {
        match &self.state {
            ConnectionState::Connected(snapshot) => Some(snapshot.address),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<&AccountSnapshot> {
        match &self.state {
            ConnectionState::Connected(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Clear everything back to defaults. Invalidates in-flight syncs.
    pub fn disconnect(&mut self) {
        self.sync_generation += 1;
        self.state = ConnectionState::Disconnected;
        self.globals = None;
    }

    /// Enter the wrong-chain state and drop all cached figures — numbers read
    /// from another network must never be displayed.
    pub fn mark_wrong_chain(&mut self, actual: u64) {
        self.sync_generation += 1;
        self.state = ConnectionState::WrongChain { actual };
        self.globals = None;
    }

    /// Start a sync pass for `address`. The returned ticket must accompany
    /// the results; only the latest ticket's results are accepted.
    pub fn begin_sync(&mut self, address: Address) -> SyncTicket {
        self.sync_generation += 1;
        SyncTicket {
            generation: self.sync_generation,
            address,
        }
    }

    /// Apply a completed sync. Returns false (and changes nothing) if the
    /// ticket was superseded or the snapshot belongs to a different address
    /// than the ticket was issued for.
    pub fn apply_sync(
        &mut self,
        ticket: SyncTicket,
        snapshot: AccountSnapshot,
        globals: Option<GlobalStats>,
    ) -> bool {
        if ticket.generation != self.sync_generation || ticket.address != snapshot.address {
            return false;
        }
        self.state = ConnectionState::Connected(snapshot);
        if globals.is_some() {
            self.globals = globals;
        }
        true
    }

    pub fn set_globals(&mut self, globals: GlobalStats) {
        self.globals = Some(globals);
    }

    /// Claim the transaction slot. Fails while another submission is pending.
    pub fn begin_transaction(&mut self) -> Result<()> {
        if self.tx_phase.is_pending() {
            return Err(WalletError::TransactionPending(
                self.tx_phase.describe().to_string(),
            ));
        }
        self.tx_phase = TxPhase::Submitting;
        Ok(())
    }

    pub fn transaction_submitted(&mut self) {
        self.tx_phase = TxPhase::Confirming;
    }

    pub fn transaction_confirmed(&mut self, tx_hash: String) {
        self.tx_phase = TxPhase::Done { tx_hash };
    }

    pub fn transaction_failed(&mut self, reason: String) {
        self.tx_phase = TxPhase::Failed { reason };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const ALICE: Address = address!("1111111111111111111111111111111111111111");
    const BOB: Address = address!("2222222222222222222222222222222222222222");

    fn globals() -> GlobalStats {
        GlobalStats {
            current_day: 500,
            total_staked: U256::from(1_000_000u64),
            charity_pool: U256::from(5_000u64),
            endowment: U256::from(7_000u64),
        }
    }

    #[test]
    fn each_state_maps_to_one_screen() {
        let mut session = Session::new();
        assert_eq!(session.screen(), Screen::ConnectPrompt);

        session.mark_wrong_chain(1);
        assert_eq!(session.screen(), Screen::WrongChainNotice);

        let ticket = session.begin_sync(ALICE);
        assert!(session.apply_sync(ticket, AccountSnapshot::empty(ALICE), None));
        assert_eq!(session.screen(), Screen::Dashboard);
    }

    #[test]
    fn disconnect_clears_cached_data() {
        let mut session = Session::new();
        let ticket = session.begin_sync(ALICE);
        assert!(session.apply_sync(
            ticket,
            AccountSnapshot::empty(ALICE),
            Some(globals())
        ));
        assert!(session.globals().is_some());

        session.disconnect();
        assert_eq!(session.state(), &ConnectionState::Disconnected);
        assert!(session.globals().is_none());
        assert!(session.snapshot().is_none());
    }

    #[test]
    fn wrong_chain_clears_cached_data() {
        let mut session = Session::new();
        let ticket = session.begin_sync(ALICE);
        session.apply_sync(ticket, AccountSnapshot::empty(ALICE), Some(globals()));

        session.mark_wrong_chain(1);
        assert_eq!(session.state(), &ConnectionState::WrongChain { actual: 1 });
        assert!(session.globals().is_none());
    }

    #[test]
    fn superseded_sync_is_discarded() {
        let mut session = Session::new();
        let stale = session.begin_sync(ALICE);
        let fresh = session.begin_sync(BOB);

        // The old address's fetch resolves late; it must not be applied.
        assert!(!session.apply_sync(stale, AccountSnapshot::empty(ALICE), None));
        assert_eq!(session.screen(), Screen::ConnectPrompt);

        assert!(session.apply_sync(fresh, AccountSnapshot::empty(BOB), None));
        assert_eq!(session.connected_address(), Some(BOB));
    }

    #[test]
    fn sync_after_disconnect_is_discarded() {
        let mut session = Session::new();
        let ticket = session.begin_sync(ALICE);
        session.disconnect();
        assert!(!session.apply_sync(ticket, AccountSnapshot::empty(ALICE), None));
        assert_eq!(session.state(), &ConnectionState::Disconnected);
    }

    #[test]
    fn mismatched_snapshot_address_is_discarded() {
        let mut session = Session::new();
        let ticket = session.begin_sync(ALICE);
        assert!(!session.apply_sync(ticket, AccountSnapshot::empty(BOB), None));
    }

    #[test]
    fn pending_transaction_blocks_second_submission() {
        let mut session = Session::new();
        session.begin_transaction().expect("slot should be free");
        assert!(matches!(
            session.begin_transaction(),
            Err(WalletError::TransactionPending(_))
        ));

        session.transaction_submitted();
        assert!(matches!(
            session.begin_transaction(),
            Err(WalletError::TransactionPending(_))
        ));

        session.transaction_confirmed("0xabc".to_string());
        assert!(session.begin_transaction().is_ok());
    }

    #[test]
    fn failed_transaction_frees_the_slot() {
        let mut session = Session::new();
        session.begin_transaction().expect("slot should be free");
        session.transaction_failed("user rejected".to_string());
        assert_eq!(
            session.tx_phase(),
            &TxPhase::Failed {
                reason: "user rejected".to_string()
            }
        );
        assert!(session.begin_transaction().is_ok());
    }
}
