//! Outbound header construction.
//!
//! Downstream services only ever see the headers named in [`HEADER_RULES`].
//! Nothing else from the inbound request is propagated.

use axum::http::{
    header::{InvalidHeaderName, InvalidHeaderValue},
    HeaderMap, HeaderName, HeaderValue,
};
use thiserror::Error;

/// How a single outbound header gets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSource {
    /// Copied from the named inbound header; omitted when the caller did not send it.
    Inbound(&'static str),
    /// Copied from the named inbound header only when present and non-empty.
    OptionalInbound(&'static str),
    /// Always set to this value.
    Fixed(&'static str),
}

/// One entry of the outbound header allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRule {
    pub outbound: &'static str,
    pub source: HeaderSource,
}

/// The complete outbound header allow-list for JSON forwarding.
pub const HEADER_RULES: &[HeaderRule] = &[
    HeaderRule { outbound: "tenantId", source: HeaderSource::Inbound("tenantid") },
    HeaderRule { outbound: "academicyearid", source: HeaderSource::Inbound("academicyearid") },
    HeaderRule { outbound: "content-type", source: HeaderSource::Fixed("application/json") },
    HeaderRule { outbound: "authorization", source: HeaderSource::Inbound("authorization") },
    HeaderRule { outbound: "x-channel-id", source: HeaderSource::OptionalInbound("x-channel-id") },
];

/// Error building the outbound set or converting it into wire headers.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("Invalid header name '{name}': {source}")]
    Name {
        name: &'static str,
        source: InvalidHeaderName,
    },

    #[error("Invalid value for header '{name}': {source}")]
    Value {
        name: &'static str,
        source: InvalidHeaderValue,
    },
}

/// Headers sent downstream, in rule order, keyed by their declared outbound name.
///
/// Inbound values are carried as received, including bytes that are not
/// valid UTF-8.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundHeaders {
    entries: Vec<(&'static str, HeaderValue)>,
}

impl OutboundHeaders {
    /// Build the outbound set from an inbound header map using [`HEADER_RULES`].
    pub fn from_inbound(inbound: &HeaderMap) -> Result<Self, HeaderError> {
        Self::with_rules(HEADER_RULES, inbound)
    }

    pub fn with_rules(rules: &[HeaderRule], inbound: &HeaderMap) -> Result<Self, HeaderError> {
        let mut entries = Vec::with_capacity(rules.len());
        for rule in rules {
            let value = match rule.source {
                HeaderSource::Fixed(v) => Some(
                    HeaderValue::from_str(v)
                        .map_err(|source| HeaderError::Value { name: rule.outbound, source })?,
                ),
                HeaderSource::Inbound(name) => inbound.get(name).cloned(),
                HeaderSource::OptionalInbound(name) => {
                    inbound.get(name).filter(|v| !v.is_empty()).cloned()
                }
            };
            if let Some(value) = value {
                entries.push((rule.outbound, value));
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &HeaderValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Convert into a wire header map. Names are lowercased on the wire.
    pub fn to_header_map(&self) -> Result<HeaderMap, HeaderError> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for &(name, ref value) in &self.entries {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|source| HeaderError::Name { name, source })?;
            map.insert(header_name, value.clone());
        }
        Ok(map)
    }
}
