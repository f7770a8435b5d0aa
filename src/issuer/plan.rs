//! Issuance plan and nonce assignment.

use std::time::Duration;

use alloy::primitives::{Address, U256};

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::validation::{parse_amount, parse_recipient, ValidationError};
use crate::config::LoadConfig;

/// Immutable description of one load-generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuancePlan {
    /// Recipient of every transfer.
    pub to: Address,
    /// Value of each transfer in wei.
    pub value: U256,
    /// Gas limit of each transfer.
    pub gas_limit: u64,
    /// Number of transfers to schedule.
    pub count: u64,
    /// Delay between two consecutive submissions.
    pub interval: Duration,
}

impl IssuancePlan {
    /// Build a plan from the `[load]` config section.
    pub fn from_config(config: &LoadConfig) -> Result<Self, ValidationError> {
        if config.gas_limit == 0 {
            return Err(ValidationError::NotPositive { field: "load.gas_limit" });
        }
        if config.interval_ms == 0 {
            return Err(ValidationError::NotPositive { field: "load.interval_ms" });
        }

        Ok(Self {
            to: parse_recipient(&config.to)?,
            value: parse_amount("load.value", &config.value)?,
            gas_limit: config.gas_limit,
            count: config.count,
            interval: Duration::from_millis(config.interval_ms),
        })
    }

    /// The transfer to submit with the given nonce.
    pub fn transfer(&self, nonce: u64) -> Transfer {
        Transfer {
            to: self.to,
            value: self.value,
            gas_limit: self.gas_limit,
            nonce,
        }
    }
}

/// One value transfer, ready to be signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub to: Address,
    pub value: U256,
    pub gas_limit: u64,
    pub nonce: u64,
}

/// Hands out `base, base + 1, ...` in order.
///
/// Owned by a single issuance loop; nonces depend only on loop position.
#[derive(Debug)]
pub struct NonceCounter {
    base: u64,
    next: Option<u64>,
}

impl NonceCounter {
    pub fn new(base: u64) -> Self {
        Self {
            base,
            next: Some(base),
        }
    }

    /// Take the next nonce. Fails once the `u64` nonce space is exhausted.
    pub fn next_nonce(&mut self) -> BlockchainResult<u64> {
        let nonce = self
            .next
            .ok_or_else(|| BlockchainError::Nonce("nonce space exhausted".to_string()))?;
        self.next = nonce.checked_add(1);
        Ok(nonce)
    }

    /// The nonce the counter was seeded with.
    pub fn base(&self) -> u64 {
        self.base
    }
}
