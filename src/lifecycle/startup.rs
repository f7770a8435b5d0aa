//! Startup orchestration.
//!
//! Order: wallet → RPC client → chain ID check → transaction builder.
//! Any startup error is fatal; nothing is sent before all steps succeed.

use std::net::SocketAddr;

use crate::blockchain::{BlockchainResult, RpcClient, TxBuilder, Wallet};
use crate::config::DevnetConfig;
use crate::observability::metrics;

/// Everything a command needs to talk to the chain.
#[derive(Debug, Clone)]
pub struct ChainContext {
    pub wallet: Wallet,
    pub client: RpcClient,
    pub builder: TxBuilder,
}

/// Connect to the configured chain with the configured account.
pub async fn connect(config: &DevnetConfig) -> BlockchainResult<ChainContext> {
    let wallet = Wallet::from_config(&config.account)?;
    let client = RpcClient::new(config.rpc.clone(), &wallet)?;
    let chain_id = client.resolve_chain_id().await?;
    let builder = TxBuilder::new(client.clone(), wallet.clone(), chain_id);

    Ok(ChainContext {
        wallet,
        client,
        builder,
    })
}

/// Start the metrics endpoint if enabled. Failure is logged, not fatal.
pub fn start_metrics(config: &DevnetConfig) {
    if !config.observability.metrics_enabled {
        return;
    }
    match config.observability.metrics_address.parse::<SocketAddr>() {
        Ok(addr) => {
            if let Err(e) = metrics::init_metrics(addr) {
                tracing::error!(error = %e, "Failed to start metrics endpoint");
            }
        }
        Err(_) => tracing::error!(
            metrics_address = %config.observability.metrics_address,
            "Failed to parse metrics address"
        ),
    }
}
