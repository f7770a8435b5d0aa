//! Load generation: rate-limited, fire-and-forget value transfers.
//!
//! # Data Flow
//! ```text
//! LoadConfig
//!     → plan.rs (IssuancePlan, validated once)
//!     → scheduler.rs (one nonce query, then one spawned submission per interval)
//!         → sink.rs (sign + eth_sendRawTransaction)
//!     → outcome.rs (mpsc channel, logged as replies arrive)
//! ```
//!
//! # Design Decisions
//! - Nonces are `base + index`, never adjusted after failures
//! - No retry, backoff, gas-price adaptation or confirmation tracking
//! - The chain is reached only through [`TransferSink`], passed in at construction

pub mod outcome;
pub mod plan;
pub mod scheduler;
pub mod sink;

pub use outcome::{record_outcomes, OutcomeTally, SubmissionOutcome};
pub use plan::{IssuancePlan, NonceCounter, Transfer};
pub use scheduler::{IssuanceSummary, TransactionIssuer};
pub use sink::{RpcTransferSink, TransferSink};
