mod repl;

use anyhow::Result;
use clap::Parser;
use ophir_wallet_core::commands::Command;
use ophir_wallet_core::config::ChainConfig;
use ophir_wallet_core::network::ContractClient;
use ophir_wallet_core::service::StakingService;
use ophir_wallet_core::wallet::WalletKey;
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(
    name = "ophir-wallet",
    about = "OPHIR staking wallet — community terminal frontend",
    version
)]
pub(crate) struct Cli {
    /// Custom PulseChain RPC endpoint (default: https://rpc.pulsechain.com)
    #[arg(long)]
    node: Option<String>,

    /// Allow connecting to non-HTTPS node URLs
    #[arg(long)]
    insecure: bool,

    /// Environment variable holding the wallet private key (hex)
    #[arg(long, default_value = "OPHIR_WALLET_KEY")]
    key_env: String,

    /// Run a single command and exit
    #[arg(long)]
    cmd: Option<String>,

    /// Output in JSON format (useful with --cmd)
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn chain_config(&self) -> ChainConfig {
        match &self.node {
            Some(url) => ChainConfig::with_rpc_url(url.clone()),
            None => ChainConfig::default(),
        }
    }

    /// Read the wallet key from the configured environment variable, if set.
    fn key_from_env(&self) -> Result<Option<WalletKey>> {
        match std::env::var(&self.key_env) {
            Ok(raw) => {
                let raw = Zeroizing::new(raw);
                Ok(Some(WalletKey::from_hex(&raw)?))
            }
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(anyhow::anyhow!("Cannot read ${}: {e}", self.key_env)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(cmd_str) = &cli.cmd {
        // One-shot mode
        run_oneshot(&cli, cmd_str).await
    } else {
        // REPL mode
        repl::run_repl(&cli).await
    }
}

async fn run_oneshot(cli: &Cli, cmd_str: &str) -> Result<()> {
    let config = cli.chain_config();
    let decimals = config.decimals;
    let client = ContractClient::new(config, cli.insecure)?;
    let mut service = StakingService::new(client);
    service.verify_decimals().await?;

    if let Some(key) = cli.key_from_env()? {
        service.connect(key).await?;
    }

    let command = Command::parse(cmd_str, decimals)?;
    if matches!(command, Command::Connect) {
        anyhow::bail!(
            "'connect' is interactive; set the key via ${} for one-shot mode.",
            cli.key_env
        );
    }

    let output = command.execute(&mut service, cli.json).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
