use anyhow::{bail, Result};

use super::Command;
use crate::display;

impl Command {
    /// Parse a command from a raw input string. Amounts are parsed at the
    /// configured decimals so precision is decided in one place.
    pub fn parse(input: &str, decimals: u8) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("No command entered. Type 'help' for a list of commands.");
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();
        let args = &parts[1..];

        match cmd.as_str() {
            "balance" | "bal" => Ok(Command::Balance),

            "address" | "addr" => Ok(Command::Address),

            "stakes" => Ok(Command::Stakes),

            "globals" | "stats" => Ok(Command::Globals),

            "status" => Ok(Command::Status),

            "refresh" | "sync" => Ok(Command::Refresh),

            "preview" | "estimate" => {
                let (amount, days, raw_amount) = parse_amount_days(args, "preview", decimals)?;
                Ok(Command::Preview { amount, days, raw_amount })
            }

            "stake" => {
                let (amount, days, raw_amount) = parse_amount_days(args, "stake", decimals)?;
                if amount.is_zero() {
                    bail!("Cannot stake 0 OPHIR.");
                }
                Ok(Command::Stake { amount, days, raw_amount })
            }

            "end" | "end_stake" => {
                let (index, stake_id) = parse_index_id(args, "end")?;
                Ok(Command::EndStake { index, stake_id })
            }

            "scrape" => {
                let (index, stake_id) = parse_index_id(args, "scrape")?;
                Ok(Command::Scrape { index, stake_id })
            }

            "connect" => Ok(Command::Connect),

            "disconnect" => Ok(Command::Disconnect),

            "help" | "?" => Ok(Command::Help {
                command: args.first().map(|s| s.to_string()),
            }),

            "exit" | "quit" | "q" => Ok(Command::Exit),

            other => bail!("Unknown command: '{other}'. Type 'help' for a list of commands."),
        }
    }
}

fn parse_amount_days(
    args: &[&str],
    usage: &str,
    decimals: u8,
) -> Result<(alloy::primitives::U256, u64, String)> {
    let amount_str = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Missing amount. Usage: {usage} <amount> <days>"))?;
    let days_str = args
        .get(1)
        .ok_or_else(|| anyhow::anyhow!("Missing days. Usage: {usage} <amount> <days>"))?;

    let amount = display::parse_token_amount(amount_str, decimals)
        .map_err(|e| anyhow::anyhow!("Invalid amount '{amount_str}': {e}"))?;
    let days: u64 = days_str
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid days '{days_str}': expected a whole number"))?;

    Ok((amount, days, amount_str.to_string()))
}

fn parse_index_id(args: &[&str], usage: &str) -> Result<(u64, Option<u64>)> {
    let index_str = args.first().ok_or_else(|| {
        anyhow::anyhow!("Missing stake index. Usage: {usage} <index> [stake_id]\n  Use 'stakes' to list indexes.")
    })?;
    let index: u64 = index_str
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid stake index '{index_str}': expected a whole number"))?;

    let stake_id = match args.get(1) {
        Some(id_str) => Some(id_str.parse().map_err(|_| {
            anyhow::anyhow!("Invalid stake id '{id_str}': expected a whole number")
        })?),
        None => None,
    };

    Ok((index, stake_id))
}
