#[must_use]
pub fn help_text(command: Option<&str>) -> String {
    match command {
        Some("balance") | Some("bal") => {
            "balance\n  Show the OPHIR balance for the connected address.\n  Alias: bal".to_string()
        }
        Some("address") | Some("addr") => {
            "address\n  Show the connected wallet address.\n  Alias: addr".to_string()
        }
        Some("stakes") => {
            "stakes\n  Show your stake list: principal, duration, start/end day,\n  scraped yield, and what is currently available to scrape.".to_string()
        }
        Some("globals") | Some("stats") => {
            "globals\n  Show network stats from the contract: current day, total staked,\n  charity pool, and endowment pool.\n  Works without a connected wallet.\n  Alias: stats".to_string()
        }
        Some("status") => {
            "status\n  Show the connection state, contract address, chain, and node URL.".to_string()
        }
        Some("refresh") | Some("sync") => {
            "refresh\n  Re-check the chain and re-fetch balance, stakes, and stats.\n  Alias: sync".to_string()
        }
        Some("preview") | Some("estimate") => {
            "preview <amount> <days>\n  Estimate the yield for staking <amount> OPHIR over <days> days.\n  Days must be within the contract's 1-8357 range.\n  Example: preview 100 365\n  Alias: estimate".to_string()
        }
        Some("stake") => {
            "stake <amount> <days>\n  Lock <amount> OPHIR for <days> days (1-8357).\n  Amount is in OPHIR (e.g. '1.5').\n  Example: stake 100 30".to_string()
        }
        Some("end") | Some("end_stake") => {
            "end <index> [stake_id]\n  End the stake at <index>. Mature stakes pay out in full; ending\n  early is penalized by the contract.\n  Use 'stakes' to find indexes. Alias: end_stake".to_string()
        }
        Some("scrape") => {
            "scrape <index> [stake_id]\n  Withdraw accrued yield from an active stake, subject to the\n  contract's penalty. Use 'stakes' to see what is available.".to_string()
        }
        Some("connect") => {
            "connect\n  Attach a wallet key (hidden prompt). The key stays in memory\n  only and is never written to disk.".to_string()
        }
        Some("disconnect") => {
            "disconnect\n  Detach the wallet key and clear all cached balances and stakes.".to_string()
        }
        Some("exit") | Some("quit") | Some("q") => {
            "exit\n  Exit the wallet.\n  Aliases: quit, q".to_string()
        }
        Some(other) => format!("Unknown command: '{other}'. Type 'help' for a list."),
        None => {
            "Available commands:\n\
             \n\
             \x20 balance      Show OPHIR balance\n\
             \x20 address      Show wallet address\n\
             \x20 stakes       Show your stake list\n\
             \x20 globals      Show network stats (no wallet needed)\n\
             \x20 preview      Estimate yield for an amount and duration\n\
             \x20 stake        Start a new stake\n\
             \x20 end          End a stake by index\n\
             \x20 scrape       Scrape accrued yield from a stake\n\
             \x20 refresh      Re-sync from the chain\n\
             \x20 status       Show connection state and node info\n\
             \x20 connect      Attach a wallet key\n\
             \x20 disconnect   Detach the wallet key\n\
             \x20 help         Show help for a command\n\
             \x20 exit         Exit the wallet\n\
             \n\
             Type 'help <command>' for details."
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_help_lists_all_commands() {
        let text = help_text(None);
        for cmd in [
            "balance", "address", "stakes", "globals", "preview", "stake", "end", "scrape",
            "refresh", "status", "connect", "disconnect", "help", "exit",
        ] {
            assert!(text.contains(cmd), "help should mention '{cmd}'");
        }
    }

    #[test]
    fn command_help_resolves_aliases() {
        assert!(help_text(Some("bal")).contains("balance"));
        assert!(help_text(Some("stats")).contains("globals"));
        assert!(help_text(Some("q")).contains("exit"));
    }

    #[test]
    fn unknown_topic_reports_it() {
        assert!(help_text(Some("bogus")).contains("Unknown command"));
    }
}
