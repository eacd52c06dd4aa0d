//! Domain error type for wallet operations.

use thiserror::Error;

/// Typed error enum for wallet operations, allowing callers to match on
/// specific failure modes instead of inspecting opaque `anyhow::Error` messages.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No wallet key is attached to the session.
    #[error("Not connected. Use 'connect' to attach a wallet key.")]
    Disconnected,

    /// The RPC endpoint reports a chain other than the supported one.
    #[error("Wrong network: chain {actual}, expected {expected} (PulseChain). Reads and writes are blocked until the node is switched.")]
    WrongChain { expected: u64, actual: u64 },

    /// Invalid or unparsable token amount.
    #[error("{0}")]
    InvalidAmount(String),

    /// Stake duration outside the contract's allowed range.
    #[error("{0}")]
    InvalidDuration(String),

    /// A transaction is already in flight; no second submission allowed.
    #[error("A transaction is already {0}. Wait for it to confirm or fail before submitting another.")]
    TransactionPending(String),

    /// Transaction reverted, was rejected, or its receipt reported failure.
    #[error("{0}")]
    TransactionFailed(String),

    /// Network or RPC communication failure.
    #[error("{0}")]
    Network(String),

    /// Signing key parse or signature error.
    #[error("{0}")]
    Signing(String),

    /// Invalid session state or configuration.
    #[error("{0}")]
    InvalidState(String),

    /// Unexpected error from internal subsystems.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Alias for `std::result::Result<T, WalletError>`.
pub type Result<T> = std::result::Result<T, WalletError>;
