//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → CLI flag overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → DevnetConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError, ConfigOverrides};
pub use schema::{
    AccountConfig, DeployConfig, DevnetConfig, LoadConfig, ObservabilityConfig, RpcConfig,
    TokenConfig,
};
pub use validation::{validate_config, ValidationError};
