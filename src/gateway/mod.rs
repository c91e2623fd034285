//! Downstream forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! JSON path:
//!     inbound headers → headers.rs (allow-list remap)
//!     → forwarder.rs (one HTTP call)
//!     → outcome.rs (classify, optional license remap)
//!     → ResponseSink (status + body) or returned failure
//!
//! Multipart path:
//!     caller-built form → multipart.rs (one POST)
//!     → outcome.rs (classify) → value returned to caller
//! ```
//!
//! # Design Decisions
//! - No retries, no timeout overrides, no routing: one call to one destination
//! - Every failure is converted into a `DispatchOutcome` variant; nothing panics

pub mod forwarder;
pub mod headers;
pub mod multipart;
pub mod outcome;

pub use forwarder::{CapturedResponse, ForwardRequest, Forwarder};
pub use headers::{HeaderRule, HeaderSource, OutboundHeaders, HEADER_RULES};
pub use outcome::{internal_error_payload, remap_license_error, DispatchOutcome, ResponseSink};
