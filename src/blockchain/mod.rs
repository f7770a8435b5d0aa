//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Config / environment (mnemonic or private key, RPC URL)
//!     → wallet.rs (key loading, signing)
//!     → client.rs (RPC connection, read timeouts, broadcast)
//!     → transaction.rs (build, sign, confirm)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC reads have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::RpcClient;
pub use transaction::TxBuilder;
pub use types::{BlockchainError, BlockchainResult, ChainId};
pub use wallet::Wallet;
