//! The rate-limited submission loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::issuer::outcome::SubmissionOutcome;
use crate::issuer::plan::{IssuancePlan, NonceCounter};
use crate::issuer::sink::TransferSink;
use crate::observability::metrics;

/// What the loop reports once everything is scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceSummary {
    pub run_id: Uuid,
    pub base_nonce: u64,
    pub scheduled: u64,
    pub elapsed: Duration,
}

/// Submits the transfers of one plan, one per interval, without waiting for replies.
pub struct TransactionIssuer<S> {
    sink: Arc<S>,
    plan: IssuancePlan,
}

impl<S: TransferSink> TransactionIssuer<S> {
    pub fn new(sink: Arc<S>, plan: IssuancePlan) -> Self {
        Self { sink, plan }
    }

    /// Run the loop.
    ///
    /// Only the initial nonce query can fail the run. Each submission is a
    /// spawned task that reports through `outcomes`; the loop returns as soon as
    /// the last one is spawned, and replies may keep arriving afterwards.
    pub async fn run(
        &self,
        outcomes: mpsc::UnboundedSender<SubmissionOutcome>,
    ) -> BlockchainResult<IssuanceSummary> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("issuance", %run_id);

        async {
            let base_nonce = self.sink.base_nonce().await.inspect_err(|e| {
                tracing::error!(error = %e, "Could not fetch the account nonce");
            })?;
            let mut nonces = NonceCounter::new(base_nonce);

            tracing::info!(
                count = self.plan.count,
                interval = ?self.plan.interval,
                base_nonce,
                to = %self.plan.to,
                "Sending up to {} txs",
                self.plan.count
            );

            let started = Instant::now();
            let mut ticker = time::interval(self.plan.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for index in 0..self.plan.count {
                ticker.tick().await;

                let nonce = nonces.next_nonce()?;
                let transfer = self.plan.transfer(nonce);
                tracing::info!(index, nonce, "Scheduling tx #{}", index);
                metrics::record_submission_scheduled();

                let sink = Arc::clone(&self.sink);
                let outcomes = outcomes.clone();
                tokio::spawn(
                    async move {
                        let result = sink.submit(transfer).await;
                        // The receiver may be gone if the process is shutting down.
                        let _ = outcomes.send(SubmissionOutcome {
                            index,
                            nonce,
                            result,
                        });
                    }
                    .in_current_span(),
                );
            }

            let summary = IssuanceSummary {
                run_id,
                base_nonce,
                scheduled: self.plan.count,
                elapsed: started.elapsed(),
            };
            tracing::info!(
                scheduled = summary.scheduled,
                elapsed = ?summary.elapsed,
                "Done scheduling txs"
            );
            Ok::<_, BlockchainError>(summary)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::outcome::record_outcomes;
    use crate::issuer::plan::Transfer;
    use alloy::primitives::{Address, TxHash, U256};
    use std::collections::HashSet;
    use std::future::Future;
    use std::sync::Mutex;

    /// Sink with scripted replies that records when each submission started.
    struct ScriptedSink {
        base_nonce: Option<u64>,
        fail_nonces: HashSet<u64>,
        reply_delay: Duration,
        slow_nonce: Option<(u64, Duration)>,
        started: Instant,
        calls: Mutex<Vec<(u64, Duration)>>,
        base_nonce_queries: Mutex<u32>,
    }

    impl ScriptedSink {
        fn new(base_nonce: u64) -> Self {
            Self {
                base_nonce: Some(base_nonce),
                fail_nonces: HashSet::new(),
                reply_delay: Duration::from_millis(50),
                slow_nonce: None,
                started: Instant::now(),
                calls: Mutex::new(Vec::new()),
                base_nonce_queries: Mutex::new(0),
            }
        }

        fn calls(&self) -> Vec<(u64, Duration)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl TransferSink for ScriptedSink {
        fn base_nonce(&self) -> impl Future<Output = BlockchainResult<u64>> + Send {
            *self.base_nonce_queries.lock().unwrap() += 1;
            let result = self
                .base_nonce
                .ok_or_else(|| BlockchainError::Rpc("connection refused".into()));
            async move { result }
        }

        fn submit(&self, transfer: Transfer) -> impl Future<Output = BlockchainResult<TxHash>> + Send {
            self.calls
                .lock()
                .unwrap()
                .push((transfer.nonce, self.started.elapsed()));

            let delay = match self.slow_nonce {
                Some((nonce, delay)) if nonce == transfer.nonce => delay,
                _ => self.reply_delay,
            };
            let fail = self.fail_nonces.contains(&transfer.nonce);
            async move {
                time::sleep(delay).await;
                if fail {
                    Err(BlockchainError::Rpc("connection reset".into()))
                } else {
                    Ok(TxHash::with_last_byte(transfer.nonce as u8))
                }
            }
        }
    }

    fn plan(count: u64, interval_ms: u64) -> IssuancePlan {
        IssuancePlan {
            to: Address::with_last_byte(0x10),
            value: U256::from(1u64),
            gas_limit: 21_000,
            count,
            interval: Duration::from_millis(interval_ms),
        }
    }

    fn assert_near(actual: Duration, expected_ms: u64) {
        let expected = Duration::from_millis(expected_ms);
        assert!(
            actual >= expected && actual < expected + Duration::from_millis(20),
            "expected ~{expected:?}, got {actual:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_nonces_and_schedule() {
        let sink = Arc::new(ScriptedSink::new(5));
        let issuer = TransactionIssuer::new(sink.clone(), plan(3, 1000));
        let (tx, rx) = mpsc::unbounded_channel();

        let summary = issuer.run(tx).await.unwrap();
        let tally = record_outcomes(rx).await;

        assert_eq!(summary.base_nonce, 5);
        assert_eq!(summary.scheduled, 3);
        let calls = sink.calls();
        let nonces: Vec<u64> = calls.iter().map(|(n, _)| *n).collect();
        assert_eq!(nonces, vec![5, 6, 7]);
        assert_near(calls[0].1, 0);
        assert_near(calls[1].1, 1000);
        assert_near(calls[2].1, 2000);
        assert_eq!(tally.sent, 3);
        assert_eq!(tally.failed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_does_not_disturb_others() {
        let mut sink = ScriptedSink::new(5);
        sink.fail_nonces.insert(6);
        let sink = Arc::new(sink);
        let issuer = TransactionIssuer::new(sink.clone(), plan(3, 1000));
        let (tx, rx) = mpsc::unbounded_channel();

        issuer.run(tx).await.unwrap();
        let tally = record_outcomes(rx).await;

        assert_eq!(tally.sent, 2);
        assert_eq!(tally.failed, 1);
        assert_eq!(tally.failed_indices, vec![1]);

        let calls = sink.calls();
        assert_eq!(calls[2].0, 7);
        assert_near(calls[2].1, 2000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_reply_does_not_delay_schedule() {
        let mut sink = ScriptedSink::new(0);
        sink.slow_nonce = Some((0, Duration::from_secs(30)));
        let sink = Arc::new(sink);
        let issuer = TransactionIssuer::new(sink.clone(), plan(4, 1000));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let summary = issuer.run(tx).await.unwrap();
        assert_near(summary.elapsed, 3000);

        // The slow reply arrives last, after the loop has returned.
        let mut arrival = Vec::new();
        while let Some(outcome) = rx.recv().await {
            arrival.push(outcome.index);
        }
        assert_eq!(arrival.last(), Some(&0));
        assert_eq!(arrival.len(), 4);

        let calls = sink.calls();
        assert_eq!(calls.len(), 4);
        for (i, (nonce, at)) in calls.iter().enumerate() {
            assert_eq!(*nonce, i as u64);
            assert_near(*at, 1000 * i as u64);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_count_completes_immediately() {
        let sink = Arc::new(ScriptedSink::new(9));
        let issuer = TransactionIssuer::new(sink.clone(), plan(0, 1000));
        let (tx, rx) = mpsc::unbounded_channel();

        let summary = issuer.run(tx).await.unwrap();
        assert_eq!(summary.scheduled, 0);
        assert_eq!(summary.base_nonce, 9);
        assert_eq!(summary.elapsed, Duration::ZERO);
        assert_eq!(*sink.base_nonce_queries.lock().unwrap(), 1);
        assert!(sink.calls().is_empty());
        assert_eq!(record_outcomes(rx).await.total(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nonce_query_failure_is_fatal() {
        let mut sink = ScriptedSink::new(0);
        sink.base_nonce = None;
        let sink = Arc::new(sink);
        let issuer = TransactionIssuer::new(sink.clone(), plan(3, 1000));
        let (tx, rx) = mpsc::unbounded_channel();

        let result = issuer.run(tx).await;
        assert!(matches!(result, Err(BlockchainError::Rpc(_))));
        assert!(sink.calls().is_empty());
        assert_eq!(record_outcomes(rx).await.total(), 0);
    }
}
