//! Configuration loading from disk and environment.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::security::origin::AllowList;

/// Environment variable holding the comma-separated origin allow-list.
pub const ENV_CORS_ORIGIN_LIST: &str = "CORS_ORIGIN_LIST";
/// Environment variable overriding the listener port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding the upstream base URL.
pub const ENV_UPSTREAM_BASE_URL: &str = "UPSTREAM_BASE_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for environment variable {var}")]
    Env { var: &'static str, value: String },

    #[error(
        "Validation failed: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    Validation(Vec<ValidationError>),
}

/// A configuration that passed validation, with its parsed allow-list.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: GatewayConfig,
    pub allow_list: AllowList,
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, and validate.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let config = match path {
        Some(p) => {
            let content = fs::read_to_string(p)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok())?;
    let allow_list = validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(LoadedConfig { config, allow_list })
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(origins) = lookup(ENV_CORS_ORIGIN_LIST) {
        config.cors.origin_list = Some(origins);
    }

    if let Some(base_url) = lookup(ENV_UPSTREAM_BASE_URL) {
        config.upstream.base_url = base_url;
    }

    if let Some(port) = lookup(ENV_PORT) {
        let parsed: u16 = port.trim().parse().map_err(|_| ConfigError::Env {
            var: ENV_PORT,
            value: port.clone(),
        })?;
        if let Ok(mut addr) = config.listener.bind_address.parse::<SocketAddr>() {
            addr.set_port(parsed);
            config.listener.bind_address = addr.to_string();
        }
    }

    Ok(config)
}
