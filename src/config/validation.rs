//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Parse addresses, URLs and ether amounts once so later stages cannot fail on them
//! - Validate value ranges (gas limits > 0, interval > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DevnetConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, U256};
use thiserror::Error;

use crate::config::schema::{AccountConfig, DeployConfig, DevnetConfig, LoadConfig, RpcConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field}: invalid address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid ether amount '{value}'")]
    InvalidAmount { field: String, value: String },

    #[error("{field}: must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field}: must not be empty")]
    Empty { field: &'static str },

    #[error("account: no mnemonic or private key configured")]
    NoSigner,

    #[error("deploy.tokens: at least two tokens are needed to add liquidity, got {0}")]
    TooFewTokens(usize),
}

/// Validate the whole configuration, collecting every error.
pub fn validate_config(config: &DevnetConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_rpc(&config.rpc, &mut errors);
    validate_account(&config.account, &mut errors);
    validate_load(&config.load, &mut errors);
    validate_deploy(&config.deploy, &mut errors);

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidUrl {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_rpc(rpc: &RpcConfig, errors: &mut Vec<ValidationError>) {
    if url::Url::parse(&rpc.url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "rpc.url",
            value: rpc.url.clone(),
        });
    }
    if rpc.timeout_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "rpc.timeout_secs" });
    }
    if rpc.poll_interval_ms == 0 {
        errors.push(ValidationError::NotPositive { field: "rpc.poll_interval_ms" });
    }
    if rpc.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::NotPositive {
            field: "rpc.confirmation_timeout_secs",
        });
    }
}

fn validate_account(account: &AccountConfig, errors: &mut Vec<ValidationError>) {
    let has_key = account
        .private_key
        .as_deref()
        .is_some_and(|key| !key.trim().is_empty());
    if !has_key && account.mnemonic.trim().is_empty() {
        errors.push(ValidationError::NoSigner);
    }
}

fn validate_load(load: &LoadConfig, errors: &mut Vec<ValidationError>) {
    if let Err(e) = parse_recipient(&load.to) {
        errors.push(e);
    }
    if let Err(e) = parse_amount("load.value", &load.value) {
        errors.push(e);
    }
    if load.gas_limit == 0 {
        errors.push(ValidationError::NotPositive { field: "load.gas_limit" });
    }
    if load.interval_ms == 0 {
        errors.push(ValidationError::NotPositive { field: "load.interval_ms" });
    }
}

fn validate_deploy(deploy: &DeployConfig, errors: &mut Vec<ValidationError>) {
    if deploy.gas_limit == 0 {
        errors.push(ValidationError::NotPositive { field: "deploy.gas_limit" });
    }
    if deploy.tokens.len() < 2 {
        errors.push(ValidationError::TooFewTokens(deploy.tokens.len()));
    }
    for (i, token) in deploy.tokens.iter().enumerate() {
        if token.symbol.trim().is_empty() {
            errors.push(ValidationError::Empty { field: "deploy.tokens.symbol" });
        }
        if let Err(e) = parse_amount(&format!("deploy.tokens[{i}].supply"), &token.supply) {
            errors.push(e);
        }
    }
    if let Err(e) = parse_amount("deploy.liquidity_amount", &deploy.liquidity_amount) {
        errors.push(e);
    }
}

/// Parse the load recipient address.
pub fn parse_recipient(value: &str) -> Result<Address, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field: "load.to" });
    }
    value.trim().parse().map_err(|_| ValidationError::InvalidAddress {
        field: "load.to",
        value: value.to_string(),
    })
}

/// Parse a decimal ether amount into wei.
pub fn parse_amount(field: &str, value: &str) -> Result<U256, ValidationError> {
    let invalid = || ValidationError::InvalidAmount {
        field: field.to_string(),
        value: value.to_string(),
    };
    let value = value.trim();
    // parse_ether accepts signed input and reinterprets it as two's complement.
    if value.is_empty() || value.starts_with('-') {
        return Err(invalid());
    }
    parse_ether(value).map_err(|_| invalid())
}
