use anyhow::{bail, Result};

use super::help::help_text;
use super::Command;
use crate::config::PULSECHAIN_EXPLORER;
use crate::display;
use crate::error::WalletError;
use crate::network::TxOutcome;
use crate::service::StakingService;
use crate::session::{AccountSnapshot, ConnectionState};

impl Command {
    /// Execute a command and return the output string.
    pub async fn execute(&self, service: &mut StakingService, json_output: bool) -> Result<String> {
        let decimals = service.config().decimals;
        let chain_id = service.config().chain_id;

        match self {
            Command::Balance => {
                service.refresh().await?;
                let snapshot = require_snapshot(service)?;
                if json_output {
                    Ok(display::format_balance_json(snapshot.balance, decimals))
                } else {
                    Ok(display::format_balance(snapshot.balance, decimals))
                }
            }

            Command::Address => {
                let addr = service
                    .connected_address()
                    .ok_or(WalletError::Disconnected)?;
                let addr = format!("{addr:#x}");
                if json_output {
                    Ok(display::format_address_json(&addr))
                } else {
                    Ok(addr)
                }
            }

            Command::Stakes => {
                service.refresh().await?;
                let snapshot = require_snapshot(service)?;
                if json_output {
                    Ok(display::format_stakes_json(
                        &snapshot.stakes,
                        snapshot.current_day,
                        decimals,
                    ))
                } else {
                    Ok(display::format_stakes(
                        &snapshot.stakes,
                        snapshot.current_day,
                        decimals,
                    ))
                }
            }

            Command::Globals => {
                let globals = service.fetch_globals().await?;
                if json_output {
                    Ok(display::format_globals_json(&globals, decimals))
                } else {
                    Ok(display::format_globals(&globals, decimals))
                }
            }

            Command::Status => {
                let config = service.config();
                let screen = display::render_screen(service.session(), chain_id, decimals);
                if json_output {
                    let state = match service.session().state() {
                        ConnectionState::Disconnected => "disconnected".to_string(),
                        ConnectionState::WrongChain { actual } => format!("wrong_chain:{actual}"),
                        ConnectionState::Connected(s) => format!("connected:{:#x}", s.address),
                    };
                    Ok(serde_json::json!({
                        "state": state,
                        "tx_phase": service.session().tx_phase().to_string(),
                        "contract": format!("{:#x}", config.contract),
                        "chain_id": config.chain_id,
                        "node": config.rpc_url,
                    })
                    .to_string())
                } else {
                    Ok(format!(
                        "{screen}\n\n  Contract: {:#x}\n  Chain id: {}\n  Node:     {}\n  Tx phase: {}",
                        config.contract,
                        config.chain_id,
                        config.rpc_url,
                        service.session().tx_phase(),
                    ))
                }
            }

            Command::Refresh => {
                service.refresh().await?;
                Ok(display::render_screen(service.session(), chain_id, decimals))
            }

            Command::Preview { amount, days, raw_amount } => {
                let estimate = service.preview_interest(*amount, *days).await?;
                if json_output {
                    Ok(serde_json::json!({
                        "amount": raw_amount,
                        "days": days,
                        "estimated_yield": display::units_to_amount(estimate, decimals),
                    })
                    .to_string())
                } else {
                    Ok(display::format_preview(*amount, *days, estimate, decimals))
                }
            }

            Command::Stake { amount, days, .. } => {
                let outcome = service.start_stake(*amount, *days).await?;
                Ok(render_outcome("Stake started!", &outcome, json_output))
            }

            Command::EndStake { index, stake_id } => {
                let outcome = service.end_stake(*index, *stake_id).await?;
                Ok(render_outcome("Stake ended!", &outcome, json_output))
            }

            Command::Scrape { index, stake_id } => {
                let outcome = service.scrape_stake(*index, *stake_id).await?;
                Ok(render_outcome("Yield scraped!", &outcome, json_output))
            }

            Command::Connect => {
                bail!("'connect' is only available in the interactive shell. Use --key-env for one-shot mode.")
            }

            Command::Disconnect => {
                service.disconnect();
                Ok("Disconnected. Cached balances and stakes cleared.".to_string())
            }

            Command::Help { command } => Ok(help_text(command.as_deref())),

            Command::Exit => Ok(String::new()),
        }
    }
}

fn render_outcome(headline: &str, outcome: &TxOutcome, json_output: bool) -> String {
    if json_output {
        serde_json::json!({
            "tx_hash": outcome.tx_hash,
            "status": outcome.status,
            "gas_used": outcome.gas_used,
            "block_number": outcome.block_number,
        })
        .to_string()
    } else {
        format!(
            "{headline}\n{}",
            display::format_tx_outcome(outcome, PULSECHAIN_EXPLORER)
        )
    }
}

/// The dashboard data, or the state-specific error for the other two screens.
fn require_snapshot(service: &StakingService) -> Result<&AccountSnapshot> {
    match service.session().state() {
        ConnectionState::Connected(snapshot) => Ok(snapshot),
        ConnectionState::WrongChain { actual } => Err(WalletError::WrongChain {
            expected: service.config().chain_id,
            actual: *actual,
        }
        .into()),
        ConnectionState::Disconnected => Err(WalletError::Disconnected.into()),
    }
}
