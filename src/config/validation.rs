//! Configuration validation.
//!
//! # Responsibilities
//! - Validate the CORS origin allow-list
//! - Validate the upstream base URL and the bind address
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;
use crate::security::origin::{validate_origin_list, AllowList, OriginListError};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Origins(#[from] OriginListError),

    #[error("Invalid upstream base URL '{0}'")]
    UpstreamUrl(String),

    #[error("Invalid bind address '{0}'")]
    BindAddress(String),
}

/// Validate the configuration, returning the parsed origin allow-list.
pub fn validate_config(config: &GatewayConfig) -> Result<AllowList, Vec<ValidationError>> {
    let mut errors: Vec<ValidationError> = Vec::new();

    let allow_list = validate_origin_list(config.cors.origin_list.as_deref())
        .map_err(|e| errors.push(e.into()))
        .ok();

    let upstream_ok = Url::parse(&config.upstream.base_url)
        .map(|u| u.has_host())
        .unwrap_or(false);
    if !upstream_ok {
        errors.push(ValidationError::UpstreamUrl(config.upstream.base_url.clone()));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    match allow_list {
        Some(list) if errors.is_empty() => Ok(list),
        _ => Err(errors),
    }
}
