//! gRPC listener.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (tonic transport, graceful shutdown)
//!     → grpc.health.v1.Health (always registered)
//!     → caller's services (tonic Routes)
//! ```

pub mod server;

pub use server::GrpcServer;
