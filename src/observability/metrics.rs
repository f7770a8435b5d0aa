//! Metrics collection and exposition.
//!
//! # Metrics
//! - `devnet_submissions_scheduled_total` (counter): transfers handed to the sink
//! - `devnet_submissions_total` (counter): replies by `outcome` (sent, failed)
//! - `devnet_contracts_deployed_total` (counter): deployments by `contract`
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_submission_scheduled() {
    metrics::counter!("devnet_submissions_scheduled_total").increment(1);
}

pub fn record_submission_outcome(sent: bool) {
    let outcome = if sent { "sent" } else { "failed" };
    metrics::counter!("devnet_submissions_total", "outcome" => outcome).increment(1);
}

pub fn record_contract_deployed(contract: &str) {
    metrics::counter!("devnet_contracts_deployed_total", "contract" => contract.to_string())
        .increment(1);
}
