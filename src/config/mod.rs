//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML)
//!     → loader.rs (read & parse into ConfigSnapshot)
//!     → store.rs (basic + advanced sections, each an ArcSwap)
//!     → settings.rs (typed BasicSettings for listeners and logging)
//!
//! On reload (file change or SIGHUP):
//!     watcher.rs detects change
//!     → loader.rs parses the new file
//!     → on success: swap basic, then swap advanced
//!     → on failure: log and keep current sections
//! ```
//!
//! # Design Decisions
//! - Values are untyped `Entry`s; typed access never fails
//! - Sections are replaced whole, never merged
//! - A failed load never touches the live sections

pub mod entry;
pub mod keys;
pub mod loader;
pub mod settings;
pub mod store;
pub mod watcher;

pub use entry::Entry;
pub use loader::{ConfigError, ConfigSnapshot, Section};
pub use settings::BasicSettings;
pub use store::ConfigStore;
pub use watcher::ConfigWatcher;
