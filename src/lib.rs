//! HTTP forwarding gateway library.
//!
//! Forwards authenticated calls to downstream services with an allow-listed
//! set of headers, and validates the cross-origin allow-list used by the
//! HTTP front.

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::{load_config, GatewayConfig, LoadedConfig};
pub use gateway::{DispatchOutcome, ForwardRequest, Forwarder, ResponseSink};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use security::{validate_origin_list, AllowList};
