//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     CORS_ORIGIN_LIST → origin.rs (parse & validate) → AllowList
//!
//! Incoming request:
//!     → cors.rs (origin guard, CORS headers, preflight)
//!     → headers.rs (hardening response headers)
//!     → Pass to gateway handlers
//! ```
//!
//! # Design Decisions
//! - Fail closed: an invalid allow-list aborts startup
//! - Disallowed origins are rejected with 403, not merely left without CORS headers

pub mod cors;
pub mod headers;
pub mod origin;

pub use origin::{validate_origin_list, AllowList, OriginListError};
