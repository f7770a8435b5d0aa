//! Compiled contract artifacts.
//!
//! Accepted layouts:
//! - Truffle / Hardhat: `{"bytecode": "0x6080..."}`
//! - Waffle (Uniswap V2 builds): `{"bytecode": "6080..."}` plus `evm.bytecode.object`
//! - solc standard JSON: `{"bytecode": {"object": "6080..."}}`

use std::fs;
use std::path::{Path, PathBuf};

use alloy::primitives::Bytes;
use serde::Deserialize;

use crate::config::DeployConfig;
use crate::deploy::types::{DeployError, DeployResult};

#[derive(Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    Hex(String),
    Object { object: String },
}

#[derive(Deserialize)]
struct EvmSection {
    bytecode: Option<BytecodeField>,
}

#[derive(Deserialize)]
struct RawArtifact {
    #[serde(rename = "contractName")]
    contract_name: Option<String>,
    bytecode: Option<BytecodeField>,
    evm: Option<EvmSection>,
}

/// Creation bytecode of one contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    pub name: String,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Read an artifact file.
    pub fn load(path: &Path) -> DeployResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| DeployError::ArtifactIo {
            path: path.to_path_buf(),
            source,
        })?;
        let fallback_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::from_json(&fallback_name, &content).map_err(|reason| DeployError::ArtifactFormat {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse an artifact from JSON text. `fallback_name` is used when the
    /// artifact carries no `contractName`.
    pub fn from_json(fallback_name: &str, json: &str) -> Result<Self, String> {
        let raw: RawArtifact = serde_json::from_str(json).map_err(|e| e.to_string())?;

        let field = raw
            .bytecode
            .or_else(|| raw.evm.and_then(|evm| evm.bytecode))
            .ok_or_else(|| "no bytecode field".to_string())?;
        let hex = match field {
            BytecodeField::Hex(hex) => hex,
            BytecodeField::Object { object } => object,
        };
        let hex = hex.trim();
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        if hex.is_empty() {
            return Err("empty bytecode (abstract contract or interface?)".to_string());
        }
        if hex.contains("__") {
            return Err("bytecode has unlinked library placeholders".to_string());
        }

        let bytecode = alloy::hex::decode(hex).map_err(|e| format!("invalid bytecode hex: {}", e))?;

        Ok(Self {
            name: raw.contract_name.unwrap_or_else(|| fallback_name.to_string()),
            bytecode: bytecode.into(),
        })
    }
}

/// Every artifact the Uniswap deployment needs.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub weth: ContractArtifact,
    pub factory: ContractArtifact,
    pub router: ContractArtifact,
    pub token: ContractArtifact,
}

impl ArtifactSet {
    /// Load all artifacts, resolving paths against `artifacts_dir`.
    pub fn load(config: &DeployConfig) -> DeployResult<Self> {
        let dir = PathBuf::from(&config.artifacts_dir);
        let set = Self {
            weth: ContractArtifact::load(&dir.join(&config.weth_artifact))?,
            factory: ContractArtifact::load(&dir.join(&config.factory_artifact))?,
            router: ContractArtifact::load(&dir.join(&config.router_artifact))?,
            token: ContractArtifact::load(&dir.join(&config.token_artifact))?,
        };
        tracing::debug!(dir = %dir.display(), "Contract artifacts loaded");
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_truffle_layout() {
        let artifact = ContractArtifact::from_json(
            "WETH9",
            r#"{"contractName": "WETH9", "abi": [], "bytecode": "0x6080604052"}"#,
        )
        .unwrap();
        assert_eq!(artifact.name, "WETH9");
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn test_waffle_layout_without_prefix() {
        let artifact = ContractArtifact::from_json(
            "UniswapV2Factory",
            r#"{"abi": [], "bytecode": "60806040", "evm": {"bytecode": {"object": "ffff"}}}"#,
        )
        .unwrap();
        assert_eq!(artifact.name, "UniswapV2Factory");
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40]);
    }

    #[test]
    fn test_standard_json_layouts() {
        let nested = ContractArtifact::from_json("A", r#"{"bytecode": {"object": "0x6001"}}"#).unwrap();
        assert_eq!(nested.bytecode.to_vec(), vec![0x60, 0x01]);

        let evm_only =
            ContractArtifact::from_json("B", r#"{"evm": {"bytecode": {"object": "6002"}}}"#).unwrap();
        assert_eq!(evm_only.bytecode.to_vec(), vec![0x60, 0x02]);
    }

    #[test]
    fn test_rejects_unusable_bytecode() {
        assert!(ContractArtifact::from_json("I", r#"{"bytecode": "0x"}"#).is_err());
        assert!(ContractArtifact::from_json("I", r#"{"abi": []}"#).is_err());
        assert!(ContractArtifact::from_json("I", r#"{"bytecode": "0xzz"}"#).is_err());

        let err = ContractArtifact::from_json("L", r#"{"bytecode": "0x60__Lib__60"}"#).unwrap_err();
        assert!(err.contains("unlinked"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("devnet-artifacts-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("Token.json");
        fs::write(&path, r#"{"bytecode": "0x6080"}"#).unwrap();

        let artifact = ContractArtifact::load(&path).unwrap();
        assert_eq!(artifact.name, "Token");

        let missing = ContractArtifact::load(&dir.join("Missing.json")).unwrap_err();
        assert!(matches!(missing, DeployError::ArtifactIo { .. }));

        fs::remove_dir_all(&dir).unwrap();
    }
}
