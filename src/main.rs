//! Devnet harness.
//!
//! Two jobs against a local Ethereum-compatible node:
//!
//! ```text
//!   spam    one value transfer per interval, fire-and-forget
//!           ┌──────────┐ tick  ┌───────────┐ spawn  ┌────────────┐  eth_sendRawTransaction
//!           │ scheduler│──────▶│ nonce+i   │───────▶│ submission │──────────────────────▶ node
//!           └──────────┘       └───────────┘        └─────┬──────┘
//!                                                         │ outcome (mpsc)
//!                                                         ▼
//!                                                   ┌────────────┐
//!                                                   │  recorder  │ → logs, metrics
//!                                                   └────────────┘
//!
//!   deploy  WETH → factory → router → tokens → approvals → addLiquidity → reserves
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use devnet_harness::config::{resolve_config, ConfigOverrides, DevnetConfig};
use devnet_harness::deploy::{ArtifactSet, Deployer, UniswapDeployment};
use devnet_harness::issuer::{record_outcomes, IssuancePlan, RpcTransferSink, TransactionIssuer};
use devnet_harness::lifecycle::startup;
use devnet_harness::observability::logging;

#[derive(Parser)]
#[command(name = "devnet-harness")]
#[command(about = "Load generation and Uniswap V2 deployment for a local devnet", long_about = None)]
struct Cli {
    /// TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the JSON-RPC endpoint.
    #[arg(long)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send value transfers at a fixed rate without waiting for replies
    Spam {
        /// Number of transfers
        #[arg(long)]
        count: Option<u64>,
        /// Milliseconds between two transfers
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Recipient address
        #[arg(long)]
        to: Option<String>,
        /// Value per transfer, in ether
        #[arg(long)]
        value: Option<String>,
    },
    /// Deploy WETH, the Uniswap V2 factory and router, and two ERC-20 tokens
    Deploy {
        /// Only deploy; do not approve or add liquidity
        #[arg(long)]
        skip_liquidity: bool,
        /// Write deployed addresses to this JSON file
        #[arg(long)]
        output: Option<String>,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            rpc_url: self.rpc_url.clone(),
            ..ConfigOverrides::default()
        };
        match &self.command {
            Commands::Spam {
                count,
                interval_ms,
                to,
                value,
            } => {
                overrides.count = *count;
                overrides.interval_ms = *interval_ms;
                overrides.to = to.clone();
                overrides.value = value.clone();
            }
            Commands::Deploy { output, .. } => {
                overrides.deploy_output = output.clone();
            }
        }
        overrides
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref(), &cli.overrides())?;

    logging::init_logging(&config.observability);
    tracing::info!(
        rpc_url = %config.rpc.url,
        "devnet-harness v{} starting",
        env!("CARGO_PKG_VERSION")
    );
    startup::start_metrics(&config);

    match cli.command {
        Commands::Spam { .. } => spam(&config).await?,
        Commands::Deploy { skip_liquidity, .. } => deploy(&config, skip_liquidity).await?,
    }

    Ok(())
}

async fn spam(config: &DevnetConfig) -> Result<(), Box<dyn Error>> {
    let plan = IssuancePlan::from_config(&config.load)?;
    let chain = startup::connect(config).await?;
    let gas_price = config.load.gas_price_wei.map(u128::from);
    let sink = RpcTransferSink::connect(chain.builder, gas_price).await?;

    let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
    let recorder = tokio::spawn(record_outcomes(outcomes_rx));

    let issuer = TransactionIssuer::new(Arc::new(sink), plan);
    issuer.run(outcomes_tx).await?;

    let drain = Duration::from_millis(config.load.drain_timeout_ms);
    match tokio::time::timeout(drain, recorder).await {
        Ok(Ok(tally)) => tracing::info!(
            sent = tally.sent,
            failed = tally.failed,
            "All replies received"
        ),
        Ok(Err(e)) => tracing::error!(error = %e, "Outcome recorder failed"),
        Err(_) => tracing::warn!(
            drain_timeout_ms = config.load.drain_timeout_ms,
            "Exiting with replies still outstanding"
        ),
    }
    Ok(())
}

async fn deploy(config: &DevnetConfig, skip_liquidity: bool) -> Result<(), Box<dyn Error>> {
    let artifacts = ArtifactSet::load(&config.deploy)?;
    let chain = startup::connect(config).await?;
    let deployer = Deployer::new(chain.builder, config.deploy.gas_limit);
    let deployment = UniswapDeployment::new(&deployer, &artifacts, &config.deploy);

    let mut addresses = deployment.deploy_contracts().await.inspect_err(|e| {
        tracing::error!(error = %e, "Deployment went wrong");
    })?;

    if !skip_liquidity {
        deployment.add_liquidity(&mut addresses).await.inspect_err(|e| {
            tracing::error!(error = %e, "Adding liquidity went wrong");
        })?;
    }

    if let Some(path) = &config.deploy.output {
        addresses.write_json(Path::new(path))?;
    }
    Ok(())
}
