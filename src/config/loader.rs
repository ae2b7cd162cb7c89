//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::DashboardConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `issuer.private_key`.
pub const PRIVATE_KEY_ENV_VAR: &str = "DIPLOMA_ISSUER_PRIVATE_KEY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: DashboardConfig = toml::from_str(&content)?;
    apply_env_overrides(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the default configuration with environment overrides applied.
pub fn default_config() -> Result<DashboardConfig, ConfigError> {
    let mut config = DashboardConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay secrets supplied through the environment.
pub fn apply_env_overrides(config: &mut DashboardConfig) {
    if let Ok(key) = std::env::var(PRIVATE_KEY_ENV_VAR) {
        if !key.trim().is_empty() {
            tracing::debug!(env = PRIVATE_KEY_ENV_VAR, "Issuer key taken from environment");
            config.issuer.private_key = key;
        }
    }
}
