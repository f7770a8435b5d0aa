//! Uniswap V2 environment deployment.
//!
//! # Data Flow
//! ```text
//! DeployConfig
//!     → artifacts.rs (bytecode from compiled JSON builds)
//!     → deployer.rs (send, wait for receipt, replay failures as eth_call)
//!     → uniswap.rs (WETH → factory → router → tokens → approvals → liquidity → reserves)
//!     → types.rs (DeployedAddresses, optionally written as JSON)
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: each transaction is confirmed before the next is built
//! - The first failing step aborts the rest of the sequence

pub mod artifacts;
pub mod contracts;
pub mod deployer;
pub mod types;
pub mod uniswap;

pub use artifacts::{ArtifactSet, ContractArtifact};
pub use deployer::Deployer;
pub use types::{DeployError, DeployResult, DeployedAddresses, DeployedToken, PairState};
pub use uniswap::UniswapDeployment;
