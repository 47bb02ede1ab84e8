//! Startup orchestration.
//!
//! # Responsibilities
//! - Read listener settings from the config store
//! - Build one actor per listener (gRPC, public HTTP, admin HTTP)
//! - Keep the Prometheus recorder's histograms drained
//! - Add the signal watcher and, when a config file is known, the reloader
//! - Run them as one group
//!
//! # Design Decisions
//! - Fail fast: a bind error ends the whole service
//! - Every actor is essential; any exit stops the rest
//! - Settings are read once at startup; a reload does not rebind listeners

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tonic::service::Routes;

use crate::admin::{setup_admin_router, AdminState};
use crate::config::{BasicSettings, ConfigStore, ConfigWatcher};
use crate::grpc::GrpcServer;
use crate::http::{HttpServer, HttpServerConfig};
use crate::lifecycle::group::{ActorError, Group};
use crate::lifecycle::signals::SignalWatcher;
use crate::observability::metrics::{init_metrics, upkeep_actor, UPKEEP_INTERVAL};
use crate::observability::Stats;

/// A service assembled from a config store, an HTTP router and gRPC routes.
pub struct Service {
    store: Arc<ConfigStore>,
    config_path: Option<PathBuf>,
    router: Router,
    grpc_routes: Routes,
    stats: Arc<Stats>,
    signals: Option<SignalWatcher>,
    shutdown_timeout: Option<Duration>,
}

impl Service {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self {
            store,
            config_path: None,
            router: Router::new(),
            grpc_routes: Routes::default(),
            stats: Arc::new(Stats::new()),
            signals: None,
            shutdown_timeout: None,
        }
    }

    /// Router served on the public HTTP port.
    pub fn with_router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    /// Services served on the gRPC port next to the health service.
    pub fn with_grpc_routes(mut self, routes: Routes) -> Self {
        self.grpc_routes = routes;
        self
    }

    /// Reload the store from `path` when the file changes or on SIGHUP.
    pub fn with_config_path(mut self, path: &Path) -> Self {
        self.config_path = Some(path.to_path_buf());
        self
    }

    /// Replace the OS signal watcher.
    pub fn with_signal_watcher(mut self, signals: SignalWatcher) -> Self {
        self.signals = Some(signals);
        self
    }

    /// Bound the time listeners get to stop once shutdown starts.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = Some(timeout);
        self
    }

    /// Statistics of the public router.
    pub fn stats(&self) -> Arc<Stats> {
        Arc::clone(&self.stats)
    }

    /// Build the actor group without running it.
    pub fn into_group(self) -> Group {
        let settings = BasicSettings::from_store(&self.store);

        let mut group = match self.shutdown_timeout {
            Some(timeout) => Group::new().with_shutdown_timeout(timeout),
            None => Group::new(),
        };

        let grpc_address = settings.grpc_address();
        group.add(GrpcServer::new(grpc_address.clone(), self.grpc_routes).into_actor());
        tracing::warn!(address = %grpc_address, "Serving grpc address");

        let http_config = HttpServerConfig {
            address: settings.http_address(),
            read_timeout: settings.http_read_timeout,
            write_timeout: settings.http_write_timeout,
        };
        tracing::warn!(address = %http_config.address, "Serving http address");
        group.add(
            HttpServer::new("http", http_config, self.router)
                .with_stats(Arc::clone(&self.stats))
                .into_actor(),
        );

        let prometheus = init_metrics();
        if let Some(handle) = &prometheus {
            group.add(upkeep_actor(handle.clone(), UPKEEP_INTERVAL));
        }

        let admin = setup_admin_router(AdminState {
            store: Arc::clone(&self.store),
            stats: Arc::clone(&self.stats),
            prometheus,
        });
        let admin_config = HttpServerConfig {
            address: settings.http_admin_address(),
            read_timeout: settings.http_admin_read_timeout,
            write_timeout: settings.http_admin_write_timeout,
        };
        tracing::warn!(address = %admin_config.address, "Serving admin http address");
        group.add(HttpServer::new("http-admin", admin_config, admin).into_actor());

        if let Some(path) = &self.config_path {
            group.add(ConfigWatcher::new(path, Arc::clone(&self.store)).into_actor());
        }

        group.add(self.signals.unwrap_or_default().into_actor());
        group
    }

    /// Run until a signal arrives or any listener exits.
    pub async fn run(self) -> Result<(), ActorError> {
        self.into_group().run().await
    }
}
