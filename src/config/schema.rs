//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the harness.
//! All types derive Serde traits for deserialization from config files, and
//! every default reproduces the constants of the local devnet setup.

use serde::{Deserialize, Serialize};

/// Mnemonic of the well-known development accounts (Anvil, Hardhat).
pub const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// Root configuration for the harness.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DevnetConfig {
    /// JSON-RPC endpoint settings.
    pub rpc: RpcConfig,

    /// Signing account.
    pub account: AccountConfig,

    /// Load generation (`spam` command).
    pub load: LoadConfig,

    /// Uniswap V2 environment deployment (`deploy` command).
    pub deploy: DeployConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// JSON-RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL.
    pub url: String,

    /// Expected chain ID. When unset, whatever the node reports is used.
    pub chain_id: Option<u64>,

    /// Timeout for read requests in seconds.
    pub timeout_secs: u64,

    /// Number of block confirmations required before a receipt counts.
    pub confirmation_blocks: u32,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum time to wait for a receipt in seconds.
    pub confirmation_timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8545".to_string(),
            chain_id: None,
            timeout_secs: 10,
            confirmation_blocks: 0,
            poll_interval_ms: 500,
            confirmation_timeout_secs: 120,
        }
    }
}

/// Signing account configuration.
///
/// A non-empty `private_key` takes precedence over the mnemonic.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccountConfig {
    /// BIP-39 mnemonic phrase.
    pub mnemonic: String,

    /// BIP-44 account index under `m/44'/60'/0'/0/`.
    pub derivation_index: u32,

    /// Hex-encoded private key (with or without 0x prefix). Never serialized.
    #[serde(skip_serializing)]
    pub private_key: Option<String>,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            mnemonic: DEV_MNEMONIC.to_string(),
            derivation_index: 0,
            private_key: None,
        }
    }
}

impl std::fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountConfig")
            .field("derivation_index", &self.derivation_index)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

/// Load generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Recipient of every transfer.
    pub to: String,

    /// Value of each transfer in ether (decimal string, e.g. "0.01").
    pub value: String,

    /// Gas limit of each transfer.
    pub gas_limit: u64,

    /// Total number of transfers to schedule.
    pub count: u64,

    /// Delay between two submissions in milliseconds.
    pub interval_ms: u64,

    /// Fixed gas price in wei. Queried once from the node when unset.
    pub gas_price_wei: Option<u64>,

    /// How long to wait for outstanding replies once scheduling is done.
    pub drain_timeout_ms: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            to: "0x1000000000000000000000000000000000000000".to_string(),
            value: "0.01".to_string(),
            gas_limit: 21_000,
            count: 10_000,
            interval_ms: 1_000,
            gas_price_wei: None,
            drain_timeout_ms: 1_000,
        }
    }
}

/// Uniswap V2 deployment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Directory the artifact paths below are relative to.
    pub artifacts_dir: String,

    /// Canonical WETH9 build artifact.
    pub weth_artifact: String,

    /// UniswapV2Factory build artifact.
    pub factory_artifact: String,

    /// UniswapV2Router02 build artifact.
    pub router_artifact: String,

    /// ERC20PresetFixedSupply build artifact.
    pub token_artifact: String,

    /// Gas limit for deployments and contract calls.
    pub gas_limit: u64,

    /// ERC-20 tokens to deploy. Liquidity is added for the first two.
    pub tokens: Vec<TokenConfig>,

    /// Amount of each token (in ether units) provided as liquidity.
    pub liquidity_amount: String,

    /// `addLiquidity` deadline, in seconds from now.
    pub deadline_secs: u64,

    /// Where to write the deployed addresses as JSON.
    pub output: Option<String>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: "node_modules".to_string(),
            weth_artifact: "canonical-weth/build/contracts/WETH9.json".to_string(),
            factory_artifact: "@uniswap/v2-core/build/UniswapV2Factory.json".to_string(),
            router_artifact: "@uniswap/v2-periphery/build/UniswapV2Router02.json".to_string(),
            token_artifact: "@openzeppelin/contracts/build/contracts/ERC20PresetFixedSupply.json"
                .to_string(),
            gas_limit: 6_000_000,
            tokens: vec![
                TokenConfig {
                    name: "Mehmet".to_string(),
                    symbol: "MEM".to_string(),
                    supply: default_supply(),
                },
                TokenConfig {
                    name: "New Ether".to_string(),
                    symbol: "NET".to_string(),
                    supply: default_supply(),
                },
            ],
            liquidity_amount: "10000000".to_string(),
            deadline_secs: 200_000,
            output: None,
        }
    }
}

/// ERC-20 token to deploy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Token name.
    pub name: String,

    /// Token symbol.
    pub symbol: String,

    /// Initial supply in ether units, minted to the deployer.
    #[serde(default = "default_supply")]
    pub supply: String,
}

fn default_supply() -> String {
    "9999999999999999999".to_string()
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_key_is_never_serialized() {
        let mut config = DevnetConfig::default();
        config.account.private_key = Some("0xdeadbeef".to_string());

        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("deadbeef"));
        assert!(!rendered.contains("private_key"));
        assert!(rendered.contains("derivation_index"));
        assert!(!format!("{:?}", config.account).contains("deadbeef"));
    }
}
