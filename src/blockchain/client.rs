//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint with the signing wallet attached
//! - Query chain state (chain ID, block number, balances, nonces, receipts)
//! - Bound every read with the configured timeout
//! - Broadcast transactions without a timeout: a slow reply is still a reply

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::TransportResult;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId, RpcConfig};
use crate::blockchain::wallet::Wallet;

/// Blockchain RPC client wrapper.
#[derive(Clone)]
pub struct RpcClient {
    /// Provider with the wallet filler attached.
    provider: Arc<dyn Provider + Send + Sync>,
    /// Configuration.
    config: RpcConfig,
    /// Read request timeout duration.
    timeout_duration: Duration,
}

impl RpcClient {
    /// Create a new RPC client.
    ///
    /// No request is made here; an unreachable node surfaces on first use.
    pub fn new(config: RpcConfig, wallet: &Wallet) -> BlockchainResult<Self> {
        let url: url::Url = config
            .url
            .parse()
            .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.url, e)))?;

        let provider = ProviderBuilder::new()
            .wallet(wallet.signer().clone())
            .connect_http(url);

        tracing::debug!(rpc_url = %config.url, "RPC client created");

        Ok(Self {
            provider: Arc::new(provider),
            timeout_duration: Duration::from_secs(config.timeout_secs),
            config,
        })
    }

    async fn read<T, F>(&self, what: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(request = what, error = %e, "RPC error");
                Err(e.into())
            }
            Err(_) => {
                tracing::warn!(request = what, "RPC timeout");
                Err(BlockchainError::Timeout(self.config.timeout_secs))
            }
        }
    }

    /// Query the chain ID and check it against the configured one, if any.
    pub async fn resolve_chain_id(&self) -> BlockchainResult<ChainId> {
        let chain_id = self.get_chain_id().await?;
        if let Some(expected) = self.config.chain_id {
            if chain_id.0 != expected {
                return Err(BlockchainError::ChainMismatch {
                    expected,
                    actual: chain_id.0,
                });
            }
        }
        tracing::info!(rpc_url = %self.config.url, chain_id = chain_id.0, "Connected to chain");
        Ok(chain_id)
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.read("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.read("eth_blockNumber", self.provider.get_block_number()).await
    }

    /// Get the transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        self.read(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address),
        )
        .await
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.read(
            "eth_getTransactionReceipt",
            self.provider.get_transaction_receipt(tx_hash),
        )
        .await
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.read("eth_gasPrice", self.provider.get_gas_price()).await
    }

    /// Execute a call against the latest state without sending a transaction.
    pub async fn call(&self, request: TransactionRequest) -> BlockchainResult<Bytes> {
        self.read("eth_call", self.provider.call(request)).await
    }

    /// Broadcast a signed, EIP-2718 encoded transaction.
    pub async fn send_raw_transaction(&self, encoded: &[u8]) -> BlockchainResult<TxHash> {
        let pending = self.provider.send_raw_transaction(encoded).await?;
        Ok(*pending.tx_hash())
    }

    /// Fill missing fields (nonce, fees, chain ID), sign with the wallet and broadcast.
    pub async fn send_transaction(&self, request: TransactionRequest) -> BlockchainResult<TxHash> {
        let pending = self.provider.send_transaction(request).await?;
        Ok(*pending.tx_hash())
    }

    /// Get the configuration.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Get the number of confirmation blocks required.
    pub fn confirmation_blocks(&self) -> u32 {
        self.config.confirmation_blocks
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("rpc_url", &self.config.url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.timeout_secs)
            .finish()
    }
}
