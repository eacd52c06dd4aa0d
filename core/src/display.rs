/// Output formatting — OPHIR denomination conversion and display helpers.
///
/// OPHIR uses 8 decimal places on-chain; everything here takes the decimals
/// from configuration so the precision is defined in exactly one place.
use alloy::primitives::U256;
use num_format::{Locale, ToFormattedString};

use crate::network::{GlobalStats, StakeRecord, TxOutcome};
use crate::session::{ConnectionState, Session};

/// 10^decimals as a U256.
fn scale(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

/// Convert base units to a human-readable amount string.
/// Examples at 8 decimals: 150_000_000 -> "1.50000000", 0 -> "0.00000000"
#[must_use]
pub fn units_to_amount(units: U256, decimals: u8) -> String {
    if decimals == 0 {
        return units.to_string();
    }
    let scale = scale(decimals);
    let whole = units / scale;
    let frac = (units % scale).to_string();
    format!("{whole}.{frac:0>width$}", width = decimals as usize)
}

/// Parse a human-readable amount string into base units.
/// At 8 decimals: "1.5" -> 150_000_000, "1" -> 100_000_000
#[must_use = "parsing result should be checked"]
pub fn parse_token_amount(input: &str, decimals: u8) -> Result<U256, String> {
    let input = input.trim();

    if input.is_empty() {
        return Err("Amount cannot be empty".to_string());
    }

    if input.starts_with('-') {
        return Err("Amount must be positive".to_string());
    }

    let parts: Vec<&str> = input.split('.').collect();
    if parts.len() > 2 {
        return Err("Invalid amount format. Use values like '1.5' or '0.001'.".to_string());
    }

    let whole: U256 = parts[0]
        .parse()
        .map_err(|_| format!("Invalid whole part: '{}'", parts[0]))?;

    let frac_units = if parts.len() == 2 {
        let frac_str = parts[1];
        if frac_str.is_empty() {
            // Trailing dot: "1." is treated as "1.0"
            U256::ZERO
        } else if frac_str.len() > decimals as usize {
            return Err(format!(
                "Too many decimal places. OPHIR supports up to {decimals}."
            ));
        } else {
            // Pad to the full precision
            let padded = format!("{frac_str:0<width$}", width = decimals as usize);
            padded
                .parse::<U256>()
                .map_err(|_| format!("Invalid fractional part: '{frac_str}'"))?
        }
    } else {
        U256::ZERO
    };

    whole
        .checked_mul(scale(decimals))
        .and_then(|w| w.checked_add(frac_units))
        .ok_or_else(|| "Amount too large".to_string())
}

/// Format a balance for display.
#[must_use]
pub fn format_balance(units: U256, decimals: u8) -> String {
    format!("{} OPHIR", units_to_amount(units, decimals))
}

/// Grouped form for large stats: thousands separators on the whole part,
/// fraction truncated to two places with trailing zeros dropped.
#[must_use]
pub fn format_grouped(units: U256, decimals: u8) -> String {
    let scale = scale(decimals);
    let whole = units / scale;
    let whole_str = match u128::try_from(whole) {
        Ok(w) => w.to_formatted_string(&Locale::en),
        Err(_) => whole.to_string(),
    };
    if decimals < 2 {
        return whole_str;
    }
    let frac = (units % scale).to_string();
    let frac = format!("{frac:0>width$}", width = decimals as usize);
    let frac = frac[..2].trim_end_matches('0');
    if frac.is_empty() {
        whole_str
    } else {
        format!("{whole_str}.{frac}")
    }
}

/// Format the stake list for display.
#[must_use]
pub fn format_stakes(stakes: &[StakeRecord], current_day: u64, decimals: u8) -> String {
    if stakes.is_empty() {
        return "No active stakes.".to_string();
    }

    let mut lines = Vec::with_capacity(stakes.len() * 4 + 2);
    let mut total_principal = U256::ZERO;
    for s in stakes {
        total_principal = total_principal.saturating_add(s.principal);
        let scraped_marker = if s.has_scraped() {
            format!("last scraped day {}", s.last_scrape_day)
        } else {
            "never scraped".to_string()
        };
        lines.push(format!(
            "  [{}] id {}  {}  {} days  day {} -> {}  [{}]",
            s.index,
            s.id,
            format_balance(s.principal, decimals),
            s.staked_days,
            s.start_day,
            s.unlocked_day,
            s.status(current_day),
        ));
        lines.push(format!(
            "      scraped {}  available {}  ({scraped_marker})",
            format_balance(s.scraped_interest, decimals),
            format_balance(s.available_to_scrape, decimals),
        ));
    }
    lines.push(format!(
        "\nTotal staked: {}",
        format_balance(total_principal, decimals)
    ));
    lines.join("\n")
}

/// Format the global network stats card.
#[must_use]
pub fn format_globals(globals: &GlobalStats, decimals: u8) -> String {
    format!(
        "  Current day:    {}\n  Total staked:   {} OPHIR\n  Charity pool:   {} OPHIR\n  Endowment pool: {} OPHIR",
        globals.current_day.to_formatted_string(&Locale::en),
        format_grouped(globals.total_staked, decimals),
        format_grouped(globals.charity_pool, decimals),
        format_grouped(globals.endowment, decimals),
    )
}

/// Format a confirmed transaction outcome.
#[must_use]
pub fn format_tx_outcome(outcome: &TxOutcome, explorer: &str) -> String {
    let block = outcome
        .block_number
        .map(|b| b.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "  Tx:       {}\n  Status:   {}\n  Block:    {block}\n  Gas used: {}\n  Verify:   {explorer}/tx/{}",
        outcome.tx_hash, outcome.status, outcome.gas_used, outcome.tx_hash,
    )
}

/// Format an interest preview line. A zero estimate renders as no preview.
#[must_use]
pub fn format_preview(amount: U256, days: u64, estimate: U256, decimals: u8) -> String {
    if estimate.is_zero() {
        return "No yield estimate for this amount/duration.".to_string();
    }
    format!(
        "Staking {} for {days} days yields an estimated {}.",
        format_balance(amount, decimals),
        format_balance(estimate, decimals),
    )
}

/// Render the top-level screen. Exactly one of connect prompt, wrong-chain
/// notice, or dashboard — decided solely by the session's connection state.
#[must_use]
pub fn render_screen(session: &Session, expected_chain: u64, decimals: u8) -> String {
    match session.state() {
        ConnectionState::Disconnected => {
            "Not connected.\nUse 'connect' to attach a wallet key, or 'globals' for network stats.".to_string()
        }
        ConnectionState::WrongChain { actual } => format!(
            "Wrong network: chain {actual}.\nSwitch to PulseChain ({expected_chain}) to continue. Reads and writes are blocked."
        ),
        ConnectionState::Connected(snapshot) => {
            let mut out = format!(
                "Connected: {}\nBalance: {}\n\nYour stakes:\n{}",
                snapshot.address,
                format_balance(snapshot.balance, decimals),
                format_stakes(&snapshot.stakes, snapshot.current_day, decimals),
            );
            if let Some(globals) = session.globals() {
                out.push_str(&format!(
                    "\n\nNetwork stats:\n{}",
                    format_globals(globals, decimals)
                ));
            }
            out
        }
    }
}

/// Format balance as JSON.
#[must_use]
pub fn format_balance_json(units: U256, decimals: u8) -> String {
    serde_json::json!({
        "balance_units": units.to_string(),
        "balance_ophir": units_to_amount(units, decimals),
    })
    .to_string()
}

/// Format address as JSON.
#[must_use]
pub fn format_address_json(address: &str) -> String {
    serde_json::json!({
        "address": address,
    })
    .to_string()
}

/// Format the stake list as JSON.
#[must_use]
pub fn format_stakes_json(stakes: &[StakeRecord], current_day: u64, decimals: u8) -> String {
    let records: Vec<serde_json::Value> = stakes
        .iter()
        .map(|s| {
            serde_json::json!({
                "index": s.index,
                "id": s.id,
                "principal": units_to_amount(s.principal, decimals),
                "staked_days": s.staked_days,
                "start_day": s.start_day,
                "unlocked_day": s.unlocked_day,
                "last_scrape_day": s.last_scrape_day,
                "scraped_interest": units_to_amount(s.scraped_interest, decimals),
                "available_to_scrape": units_to_amount(s.available_to_scrape, decimals),
                "status": s.status(current_day).to_string(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&records).unwrap_or_else(|_| "[]".to_string())
}

/// Format global stats as JSON.
#[must_use]
pub fn format_globals_json(globals: &GlobalStats, decimals: u8) -> String {
    serde_json::json!({
        "current_day": globals.current_day,
        "total_staked": units_to_amount(globals.total_staked, decimals),
        "charity_pool": units_to_amount(globals.charity_pool, decimals),
        "endowment": units_to_amount(globals.endowment, decimals),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use crate::session::{AccountSnapshot, Session};

    const DECIMALS: u8 = 8;

    fn units(n: u64) -> U256 {
        U256::from(n)
    }

    #[test]
    fn units_to_amount_zero() {
        assert_eq!(units_to_amount(U256::ZERO, DECIMALS), "0.00000000");
    }

    #[test]
    fn units_to_amount_one() {
        assert_eq!(units_to_amount(units(100_000_000), DECIMALS), "1.00000000");
    }

    #[test]
    fn units_to_amount_fractional() {
        assert_eq!(units_to_amount(units(150_000_000), DECIMALS), "1.50000000");
    }

    #[test]
    fn units_to_amount_small() {
        assert_eq!(units_to_amount(units(1), DECIMALS), "0.00000001");
    }

    #[test]
    fn units_to_amount_large() {
        assert_eq!(
            units_to_amount(units(12_345_678_901_234), DECIMALS),
            "123456.78901234"
        );
    }

    #[test]
    fn parse_whole_number() {
        assert_eq!(
            parse_token_amount("1", DECIMALS).unwrap(),
            units(100_000_000)
        );
    }

    #[test]
    fn parse_decimal() {
        assert_eq!(
            parse_token_amount("1.5", DECIMALS).unwrap(),
            units(150_000_000)
        );
    }

    #[test]
    fn parse_small_decimal() {
        assert_eq!(
            parse_token_amount("0.001", DECIMALS).unwrap(),
            units(100_000)
        );
    }

    #[test]
    fn parse_full_precision() {
        assert_eq!(
            parse_token_amount("1.12345678", DECIMALS).unwrap(),
            units(112_345_678)
        );
    }

    #[test]
    fn parse_too_many_decimals() {
        assert!(parse_token_amount("1.123456789", DECIMALS).is_err());
    }

    #[test]
    fn parse_empty_fails() {
        assert!(parse_token_amount("", DECIMALS).is_err());
    }

    #[test]
    fn parse_garbage_fails() {
        assert!(parse_token_amount("abc", DECIMALS).is_err());
    }

    #[test]
    fn parse_negative_fails() {
        assert!(parse_token_amount("-1", DECIMALS).is_err());
        assert!(parse_token_amount("-0.5", DECIMALS).is_err());
    }

    #[test]
    fn parse_trailing_dot() {
        assert_eq!(
            parse_token_amount("1.", DECIMALS).unwrap(),
            units(100_000_000)
        );
    }

    #[test]
    fn parse_round_trips_at_display_precision() {
        let parsed = parse_token_amount("100", DECIMALS).unwrap();
        assert_eq!(units_to_amount(parsed, DECIMALS), "100.00000000");
    }

    #[test]
    fn grouped_large_stat() {
        // 1,234,567.89 OPHIR
        assert_eq!(
            format_grouped(units(123_456_789_000_000), DECIMALS),
            "1,234,567.89"
        );
    }

    #[test]
    fn grouped_drops_trailing_zeros() {
        assert_eq!(format_grouped(units(100_000_000), DECIMALS), "1");
        assert_eq!(format_grouped(units(150_000_000), DECIMALS), "1.5");
    }

    #[test]
    fn format_empty_stakes() {
        assert_eq!(format_stakes(&[], 100, DECIMALS), "No active stakes.");
    }

    #[test]
    fn format_stakes_shows_status_and_totals() {
        let stakes = vec![
            StakeRecord {
                index: 0,
                id: 7,
                principal: units(10_000_000_000),
                staked_days: 30,
                start_day: 100,
                unlocked_day: 130,
                last_scrape_day: 100,
                scraped_interest: U256::ZERO,
                available_to_scrape: units(5_000_000),
            },
            StakeRecord {
                index: 1,
                id: 9,
                principal: units(20_000_000_000),
                staked_days: 10,
                start_day: 100,
                unlocked_day: 110,
                last_scrape_day: 105,
                scraped_interest: units(1_000_000),
                available_to_scrape: U256::ZERO,
            },
        ];
        let output = format_stakes(&stakes, 115, DECIMALS);
        assert!(output.contains("[Active]"));
        assert!(output.contains("[Mature (full payout)]"));
        assert!(output.contains("never scraped"));
        assert!(output.contains("last scraped day 105"));
        assert!(output.contains("Total staked: 300.00000000 OPHIR"));
    }

    #[test]
    fn screen_rendering_is_exclusive() {
        let mut session = Session::new();

        let disconnected = render_screen(&session, 369, DECIMALS);
        assert!(disconnected.contains("Not connected"));
        assert!(!disconnected.contains("Wrong network"));
        assert!(!disconnected.contains("Balance:"));

        session.mark_wrong_chain(1);
        let wrong = render_screen(&session, 369, DECIMALS);
        assert!(wrong.contains("Wrong network: chain 1"));
        assert!(!wrong.contains("Not connected"));
        assert!(!wrong.contains("Balance:"));

        let addr = address!("1111111111111111111111111111111111111111");
        let ticket = session.begin_sync(addr);
        session.apply_sync(ticket, AccountSnapshot::empty(addr), None);
        let dashboard = render_screen(&session, 369, DECIMALS);
        assert!(dashboard.contains("Balance:"));
        assert!(!dashboard.contains("Not connected"));
        assert!(!dashboard.contains("Wrong network"));
    }

    #[test]
    fn preview_zero_renders_no_estimate() {
        let text = format_preview(units(100), 30, U256::ZERO, DECIMALS);
        assert!(text.contains("No yield estimate"));
    }

    #[test]
    fn balance_json_output() {
        let json = format_balance_json(units(150_000_000), DECIMALS);
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["balance_units"], "150000000");
        assert_eq!(v["balance_ophir"], "1.50000000");
    }
}
