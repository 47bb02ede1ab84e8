//! Shutdown trigger shared between an actor's start and stop halves.

use std::sync::Arc;

use tokio::sync::watch;

/// One-way shutdown latch.
///
/// Backed by a watch channel so a trigger that fires before anyone waits is
/// not lost. Cloning shares the same latch.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Create a new, untriggered latch.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Trigger the latch. Calling this more than once is harmless.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Whether the latch has been triggered.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once the latch has been triggered.
    pub fn wait(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            // The sender lives as long as any clone of `Shutdown`, and this
            // future holds none, so a closed channel also means "stop".
            let _ = rx.wait_for(|triggered| *triggered).await;
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
