//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (CORS_ORIGIN_LIST / PORT / UPSTREAM_BASE_URL overrides)
//!     → validation.rs (semantic checks, origin allow-list)
//!     → LoadedConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults except the origin list, which must be set
//! - Any validation failure aborts startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, LoadedConfig};
pub use schema::{GatewayConfig, ListenerConfig, UpstreamConfig};
