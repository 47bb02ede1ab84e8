//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::store::ConfigStore;
use crate::lifecycle::{Actor, ActorError, Shutdown};

/// Reloads a [`ConfigStore`] whenever its source file changes.
///
/// On unix a SIGHUP forces a reload as well.
pub struct ConfigWatcher {
    path: PathBuf,
    store: Arc<ConfigStore>,
}

impl ConfigWatcher {
    /// Create a watcher that reloads `store` from `path`.
    pub fn new(path: &Path, store: Arc<ConfigStore>) -> Self {
        Self {
            path: path.to_path_buf(),
            store,
        }
    }

    /// Start watching the file in a background thread.
    ///
    /// The parent directory is watched so a file replaced by rename keeps
    /// producing events. The returned handle stops watching when dropped.
    pub fn run(&self) -> Result<RecommendedWatcher, notify::Error> {
        let store = Arc::clone(&self.store);
        let path = self.path.clone();
        let file_name = self.path.file_name().map(|name| name.to_os_string());
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let ours = event
                        .paths
                        .iter()
                        .any(|changed| changed.file_name() == file_name.as_deref());
                    if ours && (event.kind.is_modify() || event.kind.is_create()) {
                        tracing::info!("Config file change detected, reloading...");
                        reload(&store, &path);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        if !self.path.is_file() {
            return Err(notify::Error::path_not_found().add_path(self.path.clone()));
        }
        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }

    /// Turn the watcher into a group actor.
    ///
    /// Start keeps the file watch (and the SIGHUP handler) alive until stop
    /// is called. Failing to set either up fails the start.
    pub fn into_actor(self) -> Actor {
        let shutdown = Shutdown::new();
        let stopped = shutdown.wait();

        Actor::new(
            "config-watcher",
            async move {
                let _guard = self.run()?;
                wait_for_hangups(&self.store, &self.path, stopped).await?;
                tracing::debug!(path = ?self.path, "Config watcher stopped");
                Ok::<(), ActorError>(())
            },
            move |_| shutdown.trigger(),
        )
    }
}

fn reload(store: &ConfigStore, path: &Path) {
    if let Err(e) = store.set(path) {
        tracing::error!(error = %e, "Failed to reload config. Keeping current configuration.");
    }
}

#[cfg(unix)]
async fn wait_for_hangups(
    store: &ConfigStore,
    path: &Path,
    stopped: impl std::future::Future<Output = ()>,
) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    tokio::pin!(stopped);

    loop {
        tokio::select! {
            _ = &mut stopped => return Ok(()),
            Some(()) = hangup.recv() => {
                tracing::info!("SIGHUP received, reloading config");
                reload(store, path);
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_hangups(
    _store: &ConfigStore,
    _path: &Path,
    stopped: impl std::future::Future<Output = ()>,
) -> std::io::Result<()> {
    stopped.await;
    Ok(())
}
