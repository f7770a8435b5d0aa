//! Local devnet harness: fixed-rate transfer load and Uniswap V2 deployment.

pub mod blockchain;
pub mod config;
pub mod deploy;
pub mod issuer;
pub mod lifecycle;
pub mod observability;

pub use config::DevnetConfig;
pub use issuer::{IssuancePlan, TransactionIssuer};
