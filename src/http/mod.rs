//! HTTP front controller.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, JSON body / multipart decoding)
//!     → gateway (forward JSON or multipart)
//!     → response.rs (relayed response or mapped failure)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::ResponseSlot;
pub use server::HttpServer;
