//! Typed view over the `basic` section.

use std::time::Duration;

use crate::config::entry::{parse_duration, Entry};
use crate::config::keys;
use crate::config::store::ConfigStore;

/// Listener and logging settings read from the basic section.
///
/// Missing or mistyped keys read as zero values, so a port of `0` means the
/// key was absent (and binds an ephemeral port).
#[derive(Debug, Clone, PartialEq)]
pub struct BasicSettings {
    pub host: String,
    pub grpc_port: u16,
    pub http_port: u16,
    pub http_read_timeout: Duration,
    pub http_write_timeout: Duration,
    pub http_admin_port: u16,
    pub http_admin_read_timeout: Duration,
    pub http_admin_write_timeout: Duration,
    pub log_level: i64,
    pub is_local_environment: bool,
}

impl BasicSettings {
    /// Read the current basic section of `store`.
    pub fn from_store(store: &ConfigStore) -> Self {
        let port = |key: &str| u16::try_from(store.get_basic(key).as_int()).unwrap_or(0);

        Self {
            host: store.get_basic(keys::HOST).as_str().to_string(),
            grpc_port: port(keys::GRPC_PORT),
            http_port: port(keys::HTTP_PORT),
            http_read_timeout: timeout(store, keys::HTTP_READ_TIMEOUT),
            http_write_timeout: timeout(store, keys::HTTP_WRITE_TIMEOUT),
            http_admin_port: port(keys::HTTP_ADMIN_PORT),
            http_admin_read_timeout: timeout(store, keys::HTTP_ADMIN_READ_TIMEOUT),
            http_admin_write_timeout: timeout(store, keys::HTTP_ADMIN_WRITE_TIMEOUT),
            log_level: store.get_basic(keys::LOG_LEVEL).as_int(),
            is_local_environment: store.get_basic(keys::IS_LOCAL_ENVIRONMENT).as_bool(),
        }
    }

    pub fn grpc_address(&self) -> String {
        join_host_port(&self.host, self.grpc_port)
    }

    pub fn http_address(&self) -> String {
        join_host_port(&self.host, self.http_port)
    }

    pub fn http_admin_address(&self) -> String {
        join_host_port(&self.host, self.http_admin_port)
    }
}

impl Default for BasicSettings {
    fn default() -> Self {
        Self::from_store(&ConfigStore::with_defaults())
    }
}

/// Read a timeout key, warning when a set value is not a duration.
///
/// Such values read as zero, which disables the deadline.
fn timeout(store: &ConfigStore, key: &str) -> Duration {
    let entry = store.get_basic(key);
    if !is_duration(&entry) && !entry.is_empty() {
        tracing::warn!(key, value = %entry, "Timeout is not a duration, deadline disabled");
    }
    entry.as_duration()
}

fn is_duration(entry: &Entry) -> bool {
    match entry {
        Entry::Duration(_) => true,
        Entry::Str(s) => parse_duration(s).is_some(),
        _ => false,
    }
}

/// Format a `host:port` listener address, bracketing IPv6 hosts.
fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::ConfigSnapshot;

    #[test]
    fn defaults_produce_standard_addresses() {
        let settings = BasicSettings::default();
        assert_eq!(settings.grpc_address(), "0.0.0.0:6560");
        assert_eq!(settings.http_address(), "0.0.0.0:8080");
        assert_eq!(settings.http_admin_address(), "0.0.0.0:8081");
        assert_eq!(settings.http_read_timeout, Duration::from_secs(15));
        assert_eq!(settings.log_level, 1);
        assert!(settings.is_local_environment);
    }

    #[test]
    fn reads_values_from_file_sections() {
        let snapshot = ConfigSnapshot::from_yaml(
            "basic:\n  host: \"::1\"\n  http_port: 9000\n  http_write_timeout: 3s\n  grpc_port: 70000\n",
        )
        .unwrap();
        let settings = BasicSettings::from_store(&ConfigStore::from_snapshot(snapshot));

        assert_eq!(settings.http_address(), "[::1]:9000");
        assert_eq!(settings.http_write_timeout, Duration::from_secs(3));
        // Out of range ports read as absent.
        assert_eq!(settings.grpc_port, 0);
        assert_eq!(settings.http_read_timeout, Duration::ZERO);
        assert!(!settings.is_local_environment);
    }

    #[test]
    fn compound_timeouts_and_bare_integers() {
        let snapshot = ConfigSnapshot::from_yaml(
            "basic:\n  http_read_timeout: 1m30s\n  http_write_timeout: 1.5s\n  http_admin_read_timeout: 30\n",
        )
        .unwrap();
        let settings = BasicSettings::from_store(&ConfigStore::from_snapshot(snapshot));

        assert_eq!(settings.http_read_timeout, Duration::from_secs(90));
        assert_eq!(settings.http_write_timeout, Duration::from_millis(1500));
        // A YAML integer is not a duration; it disables the deadline.
        assert_eq!(settings.http_admin_read_timeout, Duration::ZERO);
        assert!(!is_duration(&Entry::Int(30)));
        assert!(is_duration(&Entry::from("30")));
    }
}
