//! Service bootstrap library: config store, listeners and lifecycle.

pub mod admin;
pub mod config;
pub mod grpc;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ConfigStore;
pub use lifecycle::{Actor, Group, Service, SignalWatcher};
