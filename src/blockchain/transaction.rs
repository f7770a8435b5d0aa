//! Transaction building, signing, and confirmation monitoring.
//!
//! # Responsibilities
//! - Build value transfers with caller-assigned nonces
//! - Sign into EIP-2718 envelopes ready for `eth_sendRawTransaction`
//! - Poll receipts until a transaction is buried deep enough

use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::RpcClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::wallet::Wallet;

/// Transaction builder for common operations.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    client: RpcClient,
    wallet: Wallet,
    chain_id: ChainId,
}

impl TxBuilder {
    /// Create a new transaction builder for an already resolved chain.
    pub fn new(client: RpcClient, wallet: Wallet, chain_id: ChainId) -> Self {
        Self {
            client,
            wallet,
            chain_id,
        }
    }

    /// Build a legacy value transfer. Every field is set, so nothing is
    /// filled in from the node.
    ///
    /// # Arguments
    /// * `to` - Destination address
    /// * `value` - Amount of native token to send
    /// * `gas_limit` - Gas limit for the transfer
    /// * `nonce` - Nonce assigned by the caller
    /// * `gas_price` - Gas price in wei
    pub fn transfer_request(
        &self,
        to: Address,
        value: U256,
        gas_limit: u64,
        nonce: u64,
        gas_price: u128,
    ) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.wallet.address())
            .with_to(to)
            .with_value(value)
            .with_nonce(nonce)
            .with_gas_limit(gas_limit)
            .with_gas_price(gas_price)
            .with_chain_id(self.chain_id.0)
    }

    /// Sign a complete request and return its EIP-2718 encoding.
    pub async fn sign(&self, request: TransactionRequest) -> BlockchainResult<Bytes> {
        let envelope = request
            .build(self.wallet.signer())
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))?;
        Ok(envelope.encoded_2718().into())
    }

    /// Wait for a transaction to be mined and confirmed.
    ///
    /// Polls every `poll_interval_ms` for at most `confirmation_timeout_secs`.
    /// A reverted receipt is returned as [`BlockchainError::Reverted`].
    pub async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<TransactionReceipt> {
        let config = self.client.config();
        let required_confirmations = u64::from(self.client.confirmation_blocks());
        let timeout_secs = config.confirmation_timeout_secs;
        let poll_interval = Duration::from_millis(config.poll_interval_ms);

        let result = timeout(Duration::from_secs(timeout_secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.client.get_transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Err(BlockchainError::Reverted(format!(
                        "transaction {} reverted",
                        tx_hash
                    )));
                }

                if required_confirmations == 0 {
                    return Ok(receipt);
                }

                let current_block = self.client.get_block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                let confirmations = current_block.saturating_sub(tx_block);

                if confirmations >= required_confirmations {
                    return Ok(receipt);
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(BlockchainError::ConfirmationTimeout(timeout_secs)),
        }
    }

    /// Get the RPC client.
    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Get the chain the builder signs for.
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }
}
