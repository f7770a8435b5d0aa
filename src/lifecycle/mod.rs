//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Logging/metrics → Wallet → RPC client → Chain check
//!
//! Run:
//!     spam: schedule every transfer, then drain replies for a bounded time
//!     deploy: sequential, stops at the first failure
//!
//! Exit:
//!     outstanding replies are abandoned once the drain timeout passes
//! ```

pub mod startup;

pub use startup::{connect, ChainContext};
