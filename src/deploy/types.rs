//! Deployment records and error definitions.

use std::fs;
use std::path::{Path, PathBuf};

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::types::BlockchainError;

/// Errors that can occur while deploying or wiring contracts.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Cannot read artifact {}: {source}", path.display())]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact {}: {reason}", path.display())]
    ArtifactFormat { path: PathBuf, reason: String },

    #[error(transparent)]
    Chain(#[from] BlockchainError),

    #[error("{0} deployment produced no contract address")]
    MissingAddress(String),

    #[error("{label} reverted: {reason}")]
    Reverted { label: String, reason: String },

    #[error("Cannot decode {call} result: {reason}")]
    Decode { call: &'static str, reason: String },

    #[error("Cannot write {}: {reason}", path.display())]
    Output { path: PathBuf, reason: String },

    #[error("Invalid amount: {0}")]
    Amount(String),
}

/// Result type for deployment operations.
pub type DeployResult<T> = Result<T, DeployError>;

/// A deployed ERC-20 token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedToken {
    pub name: String,
    pub symbol: String,
    pub address: Address,
}

/// Addresses of everything the deployment created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedAddresses {
    pub chain_id: u64,
    pub deployer: Address,
    pub weth: Address,
    pub factory: Address,
    pub router: Address,
    pub tokens: Vec<DeployedToken>,
    /// Set once liquidity has been added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair: Option<Address>,
}

impl DeployedAddresses {
    /// Write the record as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> DeployResult<()> {
        let output_err = |reason: String| DeployError::Output {
            path: path.to_path_buf(),
            reason,
        };
        let json = serde_json::to_string_pretty(self).map_err(|e| output_err(e.to_string()))?;
        fs::write(path, json).map_err(|e| output_err(e.to_string()))?;
        tracing::info!(path = %path.display(), "Deployed addresses written");
        Ok(())
    }
}

/// Reserves of a Uniswap V2 pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairState {
    pub pair: Address,
    pub reserve0: U256,
    pub reserve1: U256,
}
