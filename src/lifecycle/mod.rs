//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate (origin allow-list) → Build server → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or trigger() → broadcast → server stops accepting → drains → exits
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - In-flight forwarding calls are not cancelled; they run to completion

pub mod shutdown;

pub use shutdown::Shutdown;
