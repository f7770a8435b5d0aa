//! Where the issuer sends its transfers.

use std::future::Future;

use alloy::primitives::TxHash;

use crate::blockchain::transaction::TxBuilder;
use crate::blockchain::types::BlockchainResult;
use crate::issuer::plan::Transfer;

/// Chain access needed by the issuance loop.
///
/// `submit` must not retry or renumber: a failure belongs to that transfer only.
pub trait TransferSink: Send + Sync + 'static {
    /// Current transaction count of the sending account.
    fn base_nonce(&self) -> impl Future<Output = BlockchainResult<u64>> + Send;

    /// Sign and broadcast one transfer, resolving to its hash once the node accepts it.
    fn submit(&self, transfer: Transfer) -> impl Future<Output = BlockchainResult<TxHash>> + Send;
}

/// Signs transfers locally and broadcasts them with `eth_sendRawTransaction`.
#[derive(Debug, Clone)]
pub struct RpcTransferSink {
    builder: TxBuilder,
    gas_price: u128,
}

impl RpcTransferSink {
    /// Create a sink signing with a fixed gas price.
    pub fn new(builder: TxBuilder, gas_price: u128) -> Self {
        Self { builder, gas_price }
    }

    /// Create a sink, using `gas_price` when given and the node's current price otherwise.
    ///
    /// The price is fixed for the whole run.
    pub async fn connect(builder: TxBuilder, gas_price: Option<u128>) -> BlockchainResult<Self> {
        let gas_price = match gas_price {
            Some(price) => price,
            None => builder.client().get_gas_price().await?,
        };
        tracing::info!(gas_price_wei = gas_price, "Transfer gas price fixed");
        Ok(Self::new(builder, gas_price))
    }

    pub fn gas_price(&self) -> u128 {
        self.gas_price
    }
}

impl TransferSink for RpcTransferSink {
    async fn base_nonce(&self) -> BlockchainResult<u64> {
        self.builder
            .client()
            .get_transaction_count(self.builder.address())
            .await
    }

    async fn submit(&self, transfer: Transfer) -> BlockchainResult<TxHash> {
        let request = self.builder.transfer_request(
            transfer.to,
            transfer.value,
            transfer.gas_limit,
            transfer.nonce,
            self.gas_price,
        );
        let raw = self.builder.sign(request).await?;
        self.builder.client().send_raw_transaction(&raw).await
    }
}
