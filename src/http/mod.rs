//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (bind, common layers, graceful shutdown)
//!     → request.rs (request ID assigned and propagated)
//!     → middleware.rs (timing, stats, handler error logging)
//!     → caller's handlers
//!     → response.rs (HandlerError → status code + logged failure)
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::track_requests;
pub use request::X_REQUEST_ID;
pub use response::HandlerError;
pub use server::{HttpServer, HttpServerConfig, ServerError};
