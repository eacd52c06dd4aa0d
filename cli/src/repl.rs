use crate::Cli;
/// REPL shell — Reedline-based interactive wallet session.
use anyhow::Result;
use ophir_wallet_core::commands::Command;
use ophir_wallet_core::display;
use ophir_wallet_core::network::ContractClient;
use ophir_wallet_core::service::StakingService;
use ophir_wallet_core::wallet::{short_address, WalletKey};
use reedline::{DefaultCompleter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use zeroize::Zeroizing;

pub async fn run_repl(cli: &Cli) -> Result<()> {
    println!("OPHIR Wallet v{}", env!("CARGO_PKG_VERSION"));
    let config = cli.chain_config();
    println!("Network:  PulseChain (chain id {})", config.chain_id);
    println!("Contract: {:#x}", config.contract);
    println!();

    let decimals = config.decimals;
    let chain_id = config.chain_id;
    let client = ContractClient::new(config, cli.insecure)?;
    let mut service = StakingService::new(client);

    // Fail fast if the contract's decimals disagree with the configuration.
    service.verify_decimals().await?;

    // Auto-connect when a key is present in the environment.
    if let Some(key) = cli.key_from_env()? {
        service.connect(key).await?;
        println!(
            "{}",
            display::render_screen(service.session(), chain_id, decimals)
        );
    } else {
        println!("Not connected. Type 'connect' to attach a wallet key, or 'globals' for network stats.");
    }
    println!("Type 'help' for a list of commands.");
    println!();

    let mut prompt = make_prompt(&service);

    let commands: Vec<String> = vec![
        "balance".into(),
        "bal".into(),
        "address".into(),
        "addr".into(),
        "stakes".into(),
        "globals".into(),
        "stats".into(),
        "preview".into(),
        "estimate".into(),
        "stake".into(),
        "end".into(),
        "end_stake".into(),
        "scrape".into(),
        "refresh".into(),
        "sync".into(),
        "status".into(),
        "connect".into(),
        "disconnect".into(),
        "help".into(),
        "exit".into(),
        "quit".into(),
        "q".into(),
    ];
    let completer = Box::new(DefaultCompleter::new(commands));
    let mut line_editor = Reedline::create().with_completer(completer);

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match Command::parse(line, decimals) {
                    Ok(Command::Exit) => {
                        println!("Goodbye.");
                        break;
                    }
                    Ok(Command::Connect) => {
                        match prompt_key() {
                            Ok(key) => match service.connect(key).await {
                                Ok(()) => {
                                    println!(
                                        "{}",
                                        display::render_screen(
                                            service.session(),
                                            chain_id,
                                            decimals
                                        )
                                    );
                                }
                                Err(e) => eprintln!("Error: {e}"),
                            },
                            Err(e) => eprintln!("Error: {e}"),
                        }
                        prompt = make_prompt(&service);
                    }
                    Ok(cmd) => {
                        if let Some(prompt_msg) = cmd.confirmation_prompt() {
                            if !prompt_confirm(&prompt_msg) {
                                println!("Cancelled.");
                                continue;
                            }
                        }
                        match cmd.execute(&mut service, cli.json).await {
                            Ok(output) => {
                                if !output.is_empty() {
                                    println!("{output}");
                                }
                            }
                            Err(e) => {
                                eprintln!("Error: {e}");
                            }
                        }
                        if matches!(cmd, Command::Disconnect) {
                            prompt = make_prompt(&service);
                        }
                    }
                    Err(e) => {
                        eprintln!("{e}");
                    }
                }
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("Goodbye.");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        }
    }

    Ok(())
}

fn make_prompt(service: &StakingService) -> DefaultPrompt {
    let label = match service.connected_address() {
        Some(addr) => format!("[ophir {}]", short_address(&addr)),
        None => "[ophir disconnected]".to_string(),
    };
    DefaultPrompt::new(DefaultPromptSegment::Basic(label), DefaultPromptSegment::Empty)
}

/// Read a private key from a hidden prompt. The raw buffer is zeroized once
/// the key is parsed.
fn prompt_key() -> Result<WalletKey> {
    let raw = Zeroizing::new(rpassword::prompt_password("Private key (hex): ")?);
    Ok(WalletKey::from_hex(&raw)?)
}

fn prompt_confirm(prompt: &str) -> bool {
    use std::io::Write;
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush().ok();
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).is_ok() && input.trim().eq_ignore_ascii_case("y")
}
