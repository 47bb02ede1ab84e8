//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     ConfigStore → BasicSettings → one actor per listener → Group
//!
//! Run (group.rs):
//!     every actor's start on its own task
//!     → first start to return (Ok or Err) wins
//!     → every stop called once with that outcome
//!     → wait for the remaining starts → return the outcome
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → signal actor returns → group shuts down
//! ```
//!
//! # Design Decisions
//! - Any actor exit, clean or not, stops the whole group
//! - Stops are cooperative; an optional grace period aborts stragglers

pub mod group;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use group::{Actor, ActorError, ActorPanicked, Group};
pub use shutdown::Shutdown;
pub use signals::SignalWatcher;
pub use startup::Service;
