//! Thread-safe configuration store with hot reload.
//!
//! The store keeps the `basic` and `advanced` sections in two independent
//! [`ArcSwap`] cells. Readers take a cheap snapshot of one section and are
//! never blocked by a reload; a reload swaps each section as a whole.
//!
//! The sections are swapped one after the other (basic, then advanced), so a
//! reader that looks at both during a reload can briefly pair the new basic
//! section with the old advanced one. Within a section reads are never torn.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;

use crate::config::entry::Entry;
use crate::config::keys;
use crate::config::loader::{load_snapshot, ConfigError, ConfigSnapshot, Section};

/// Two-tier key/value configuration store.
#[derive(Debug, Default)]
pub struct ConfigStore {
    basic: ArcSwap<Section>,
    advanced: ArcSwap<Section>,
}

impl ConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the default basic settings.
    ///
    /// Used when no config file is given and by tests of other components.
    pub fn with_defaults() -> Self {
        Self::from_snapshot(default_snapshot())
    }

    /// Create a store holding the given snapshot.
    pub fn from_snapshot(snapshot: ConfigSnapshot) -> Self {
        Self {
            basic: ArcSwap::from_pointee(snapshot.basic),
            advanced: ArcSwap::from_pointee(snapshot.advanced),
        }
    }

    /// Load a store from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::from_snapshot(load_snapshot(path)?))
    }

    /// Fetch an entry from the basic section.
    pub fn get_basic(&self, key: &str) -> Entry {
        self.basic.load().get(key).cloned().unwrap_or_default()
    }

    /// Fetch an entry from the advanced section.
    pub fn get(&self, key: &str) -> Entry {
        self.advanced.load().get(key).cloned().unwrap_or_default()
    }

    /// Snapshot of the whole basic section.
    pub fn basic(&self) -> Arc<Section> {
        self.basic.load_full()
    }

    /// Snapshot of the whole advanced section.
    pub fn advanced(&self) -> Arc<Section> {
        self.advanced.load_full()
    }

    /// Replace the configuration with the contents of `path`.
    ///
    /// On any read or parse error the current configuration is left as is.
    pub fn set(&self, path: &Path) -> Result<(), ConfigError> {
        let snapshot = load_snapshot(path)?;
        self.replace(snapshot);
        tracing::info!(path = %path.display(), "Configuration reloaded");
        Ok(())
    }

    /// Install an already parsed snapshot, basic section first.
    pub fn replace(&self, snapshot: ConfigSnapshot) {
        self.basic.store(Arc::new(snapshot.basic));
        self.advanced.store(Arc::new(snapshot.advanced));
    }
}

fn default_snapshot() -> ConfigSnapshot {
    let timeout = Entry::from(Duration::from_secs(15));
    let basic: Section = [
        (keys::HOST, Entry::from("0.0.0.0")),
        (keys::GRPC_PORT, Entry::from(6560i64)),
        (keys::HTTP_PORT, Entry::from(8080i64)),
        (keys::HTTP_WRITE_TIMEOUT, timeout.clone()),
        (keys::HTTP_READ_TIMEOUT, timeout.clone()),
        (keys::HTTP_ADMIN_PORT, Entry::from(8081i64)),
        (keys::HTTP_ADMIN_READ_TIMEOUT, timeout.clone()),
        (keys::HTTP_ADMIN_WRITE_TIMEOUT, timeout),
        (keys::LOG_LEVEL, Entry::from(1i64)),
        (keys::IS_LOCAL_ENVIRONMENT, Entry::from(true)),
    ]
    .into_iter()
    .map(|(key, entry)| (key.to_string(), entry))
    .collect();

    ConfigSnapshot {
        basic,
        advanced: Section::new(),
    }
}
