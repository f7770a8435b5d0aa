//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::DevnetConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `account.private_key`.
pub const PRIVATE_KEY_ENV_VAR: &str = "DEVNET_PRIVATE_KEY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a configuration file without validating it.
///
/// Callers that apply overrides (CLI flags, environment) validate afterwards.
pub fn read_config(path: &Path) -> Result<DevnetConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<DevnetConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DevnetConfig, ConfigError> {
    let mut config = read_config(path)?;
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub rpc_url: Option<String>,
    pub count: Option<u64>,
    pub interval_ms: Option<u64>,
    pub to: Option<String>,
    pub value: Option<String>,
    pub deploy_output: Option<String>,
}

/// Build the effective configuration: file (or defaults), environment, then
/// command-line overrides, validated last.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<DevnetConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => DevnetConfig::default(),
    };
    apply_env_overrides(&mut config);
    apply_overrides(&mut config, overrides);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply command-line overrides without validating.
pub fn apply_overrides(config: &mut DevnetConfig, overrides: &ConfigOverrides) {
    if let Some(url) = &overrides.rpc_url {
        config.rpc.url = url.clone();
    }
    if let Some(count) = overrides.count {
        config.load.count = count;
    }
    if let Some(interval_ms) = overrides.interval_ms {
        config.load.interval_ms = interval_ms;
    }
    if let Some(to) = &overrides.to {
        config.load.to = to.clone();
    }
    if let Some(value) = &overrides.value {
        config.load.value = value.clone();
    }
    if overrides.deploy_output.is_some() {
        config.deploy.output = overrides.deploy_output.clone();
    }
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut DevnetConfig) {
    if let Ok(key) = std::env::var(PRIVATE_KEY_ENV_VAR) {
        if !key.trim().is_empty() {
            config.account.private_key = Some(key);
        }
    }
}
