//! Per-submission outcomes and their recording.

use alloy::primitives::TxHash;
use tokio::sync::mpsc;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::observability::metrics;

/// Result of one submission, tagged with its loop position.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub index: u64,
    pub nonce: u64,
    pub result: BlockchainResult<TxHash>,
}

impl SubmissionOutcome {
    pub fn is_sent(&self) -> bool {
        self.result.is_ok()
    }
}

/// Counts of what came back.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutcomeTally {
    pub sent: u64,
    pub failed: u64,
    /// Indices of failed submissions, in arrival order.
    pub failed_indices: Vec<u64>,
}

impl OutcomeTally {
    pub fn total(&self) -> u64 {
        self.sent + self.failed
    }

    fn record(&mut self, outcome: &SubmissionOutcome) {
        match &outcome.result {
            Ok(tx_hash) => {
                self.sent += 1;
                tracing::info!(
                    index = outcome.index,
                    nonce = outcome.nonce,
                    tx_hash = %tx_hash,
                    "tx #{} sent: {}",
                    outcome.index,
                    tx_hash
                );
            }
            Err(err) => {
                self.failed += 1;
                self.failed_indices.push(outcome.index);
                tracing::error!(
                    index = outcome.index,
                    nonce = outcome.nonce,
                    kind = error_kind(err),
                    error = %err,
                    "error on tx #{}",
                    outcome.index
                );
            }
        }
        metrics::record_submission_outcome(outcome.is_sent());
    }
}

fn error_kind(err: &BlockchainError) -> &'static str {
    match err {
        BlockchainError::Rejected { .. } => "rejected",
        BlockchainError::Rpc(_) | BlockchainError::Timeout(_) => "rpc",
        BlockchainError::Wallet(_) => "signing",
        _ => "other",
    }
}

/// Log outcomes as they arrive until every sender is gone.
pub async fn record_outcomes(mut outcomes: mpsc::UnboundedReceiver<SubmissionOutcome>) -> OutcomeTally {
    let mut tally = OutcomeTally::default();
    while let Some(outcome) = outcomes.recv().await {
        tally.record(&outcome);
    }
    tally
}
