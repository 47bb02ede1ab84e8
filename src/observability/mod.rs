//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP middleware and lifecycle events produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (Stats aggregate + metrics facade)
//!
//! Consumers:
//!     → stdout (human or JSON)
//!     → admin /status (Stats snapshot)
//!     → admin /metrics (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;

pub use metrics::{Stats, StatsSnapshot};
