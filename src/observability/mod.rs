//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarder, security and server events
//!     → tracing macros with structured fields (method, url, status, error)
//!     → logging.rs subscriber (env filter + fmt layer) → stdout
//!
//! Per request:
//!     x-request-id (generated or propagated) → TraceLayer span
//! ```

pub mod logging;
