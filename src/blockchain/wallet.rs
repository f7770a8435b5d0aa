//! Wallet management and transaction signing.
//!
//! # Security
//! - Keys come from the config file or the `DEVNET_PRIVATE_KEY` environment variable
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::AccountConfig;

/// Signing account shared by every transaction the harness sends.
#[derive(Clone)]
pub struct Wallet {
    /// The underlying signer, wrapped for use with providers and builders.
    inner: EthereumWallet,
    /// Cached signer address.
    address: Address,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        Ok(Self::from_signer(signer))
    }

    /// Derive a wallet from a BIP-39 mnemonic at `m/44'/60'/0'/0/{index}`.
    pub fn from_mnemonic(phrase: &str, index: u32) -> BlockchainResult<Self> {
        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase.trim())
            .index(index)
            .map_err(|e| BlockchainError::Wallet(format!("Invalid derivation index: {}", e)))?
            .build()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid mnemonic: {}", e)))?;

        Ok(Self::from_signer(signer))
    }

    /// Build the wallet described by the account configuration.
    ///
    /// A configured private key wins over the mnemonic.
    pub fn from_config(config: &AccountConfig) -> BlockchainResult<Self> {
        let wallet = match config.private_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Self::from_private_key(key)?,
            _ => Self::from_mnemonic(&config.mnemonic, config.derivation_index)?,
        };

        tracing::info!(address = %wallet.address(), "Wallet initialized");
        Ok(wallet)
    }

    fn from_signer(signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        Self {
            inner: EthereumWallet::from(signer),
            address,
        }
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Network wallet used to sign transaction requests.
    pub fn signer(&self) -> &EthereumWallet {
        &self.inner
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet").field("address", &self.address).finish()
    }
}
