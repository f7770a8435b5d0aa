//! Contract deployment and calls through the signing provider.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::sol_types::SolCall;

use crate::blockchain::transaction::TxBuilder;
use crate::deploy::artifacts::ContractArtifact;
use crate::deploy::types::{DeployError, DeployResult};
use crate::observability::metrics;

/// Sends deployment and call transactions one at a time, each confirmed
/// before the next.
#[derive(Debug, Clone)]
pub struct Deployer {
    builder: TxBuilder,
    gas_limit: u64,
}

impl Deployer {
    pub fn new(builder: TxBuilder, gas_limit: u64) -> Self {
        Self { builder, gas_limit }
    }

    /// Address transactions are sent from.
    pub fn address(&self) -> Address {
        self.builder.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.builder.chain_id().0
    }

    /// Deploy `artifact` with ABI-encoded constructor arguments appended.
    pub async fn deploy(&self, artifact: &ContractArtifact, constructor_args: Bytes) -> DeployResult<Address> {
        let request = deployment_request(self.address(), self.gas_limit, artifact, &constructor_args);

        let receipt = self.confirm(&artifact.name, request).await?;
        let address = receipt
            .contract_address
            .ok_or_else(|| DeployError::MissingAddress(artifact.name.clone()))?;

        metrics::record_contract_deployed(&artifact.name);
        tracing::info!(
            contract = %artifact.name,
            address = %address,
            tx_hash = %receipt.transaction_hash,
            gas_used = receipt.gas_used,
            "{} address: {}",
            artifact.name,
            address
        );
        Ok(address)
    }

    /// Send a state-changing call and wait for it to be mined.
    pub async fn send_call<C: SolCall>(&self, label: &str, to: Address, call: &C) -> DeployResult<TransactionReceipt> {
        let request = self.call_request(to, call.abi_encode().into());
        let receipt = self.confirm(label, request).await?;
        tracing::info!(
            call = label,
            tx_hash = %receipt.transaction_hash,
            block = receipt.block_number,
            "Transaction confirmed"
        );
        Ok(receipt)
    }

    /// Read-only call against the latest state.
    pub async fn read<C: SolCall>(&self, to: Address, call: &C) -> DeployResult<C::Return> {
        let request = TransactionRequest::default()
            .with_from(self.address())
            .with_to(to)
            .with_input(Bytes::from(call.abi_encode()));
        let output = self.builder.client().call(request).await?;
        C::abi_decode_returns(&output).map_err(|e| DeployError::Decode {
            call: C::SIGNATURE,
            reason: e.to_string(),
        })
    }

    fn call_request(&self, to: Address, input: Bytes) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.address())
            .with_to(to)
            .with_input(input)
            .with_gas_limit(self.gas_limit)
    }

    /// Send `request` and wait for its receipt. If it fails, replay it as an
    /// `eth_call` to recover the revert reason.
    async fn confirm(&self, label: &str, request: TransactionRequest) -> DeployResult<TransactionReceipt> {
        let attempt = async {
            let tx_hash = self.builder.client().send_transaction(request.clone()).await?;
            tracing::debug!(call = label, tx_hash = %tx_hash, "Transaction sent");
            self.builder.wait_for_confirmation(tx_hash).await
        };

        let outcome = attempt.await;
        match outcome {
            Ok(receipt) => Ok(receipt),
            Err(err) => {
                tracing::warn!(call = label, error = %err, "Transaction failed, replaying as a call to see why");
                let reason = match self.builder.client().call(request).await {
                    Err(call_err) => call_err.to_string(),
                    Ok(_) => err.to_string(),
                };
                tracing::error!(call = label, reason = %reason, "{} went wrong", label);
                Err(DeployError::Reverted {
                    label: label.to_string(),
                    reason,
                })
            }
        }
    }
}

fn deployment_request(
    from: Address,
    gas_limit: u64,
    artifact: &ContractArtifact,
    constructor_args: &[u8],
) -> TransactionRequest {
    let mut code = Vec::with_capacity(artifact.bytecode.len() + constructor_args.len());
    code.extend_from_slice(&artifact.bytecode);
    code.extend_from_slice(constructor_args);

    TransactionRequest::default()
        .with_from(from)
        .with_deploy_code(Bytes::from(code))
        .with_gas_limit(gas_limit)
}
