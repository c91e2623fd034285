//! Cross-origin allow-list parsing.
//!
//! # Responsibilities
//! - Parse the comma-separated `CORS_ORIGIN_LIST` value once at startup
//! - Reject missing, empty or malformed lists before the server binds
//! - Answer "may this `Origin` proceed?" for the HTTP layer
//!
//! # Design Decisions
//! - A leading `*` short-circuits validation of the remaining entries
//! - Matching is exact string equality, never prefix or suffix
//! - Entries are not trimmed or normalised; what is configured is what matches

use thiserror::Error;
use url::Url;

/// Wildcard sentinel meaning "allow any origin".
pub const WILDCARD: &str = "*";

/// Errors produced while validating the origin allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OriginListError {
    /// No value configured, or the value is blank.
    #[error("CORS_ORIGIN_LIST is not defined or empty")]
    Missing,

    /// At least one entry is not an absolute URL.
    #[error("Invalid CORS_ORIGIN_LIST: '{origin}' is not an absolute URL")]
    Invalid { origin: String },
}

/// Validated set of origins permitted to make cross-origin calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowList {
    /// Every origin is permitted.
    Any,
    /// Only these exact origin strings are permitted, in configured order.
    Exact(Vec<String>),
}

impl AllowList {
    /// Check whether a request origin may proceed.
    pub fn is_allowed(&self, origin: &str) -> bool {
        match self {
            AllowList::Any => true,
            AllowList::Exact(origins) => origins.iter().any(|o| o == origin),
        }
    }

    pub fn allows_any(&self) -> bool {
        matches!(self, AllowList::Any)
    }
}

/// Validate a raw comma-separated origin list.
///
/// `None` models an unset configuration value.
pub fn validate_origin_list(raw: Option<&str>) -> Result<AllowList, OriginListError> {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() => r,
        _ => return Err(OriginListError::Missing),
    };

    let origins: Vec<&str> = raw.split(',').collect();

    if origins.first() == Some(&WILDCARD) {
        return Ok(AllowList::Any);
    }

    if let Some(bad) = origins.iter().find(|o| !is_absolute_url(o)) {
        return Err(OriginListError::Invalid {
            origin: (*bad).to_string(),
        });
    }

    Ok(AllowList::Exact(origins.into_iter().map(String::from).collect()))
}

fn is_absolute_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => url.has_host(),
        Err(_) => false,
    }
}
