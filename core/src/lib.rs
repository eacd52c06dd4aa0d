pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod network;
pub mod service;
pub mod session;
pub mod wallet;

pub use commands::Command;
pub use config::ChainConfig;
pub use error::WalletError;
pub use network::{ContractClient, GlobalStats, StakeRecord, StakeStatus, TxOutcome};
pub use service::StakingService;
pub use session::{AccountSnapshot, ConnectionState, Screen, Session, TxPhase};
pub use wallet::{short_address, WalletKey};

pub use alloy::primitives::{Address, U256};
