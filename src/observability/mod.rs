//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! issuer / deploy / blockchain produce:
//!     → logging.rs (structured tracing events, one per submission and reply)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
