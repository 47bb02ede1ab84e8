//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (ctrl-c) or SIGTERM
//! - Report the signal as a clean actor exit so the group shuts down
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A received signal is not an error: the run result is `Ok(())`
//! - SIGHUP is owned by the config watcher (reload), not by this actor

use futures_util::future::BoxFuture;
use std::future::Future;

use crate::lifecycle::group::{Actor, ActorError};
use crate::lifecycle::shutdown::Shutdown;

/// Actor that returns when the process is asked to terminate.
pub struct SignalWatcher {
    signal: BoxFuture<'static, std::io::Result<()>>,
}

impl SignalWatcher {
    /// Watch the OS termination signals.
    pub fn new() -> Self {
        Self::from_future(terminate_signal())
    }

    /// Watch an arbitrary future instead of OS signals.
    pub fn from_future<F>(signal: F) -> Self
    where
        F: Future<Output = std::io::Result<()>> + Send + 'static,
    {
        Self {
            signal: Box::pin(signal),
        }
    }

    /// Turn the watcher into a group actor.
    ///
    /// Start resolves when the signal fires (or fails to install); stop
    /// releases a start that is still waiting.
    pub fn into_actor(self) -> Actor {
        let shutdown = Shutdown::new();
        let stopped = shutdown.wait();
        let signal = self.signal;

        Actor::new(
            "signals",
            async move {
                tokio::select! {
                    received = signal => {
                        received?;
                        tracing::info!("Shutdown signal received");
                    }
                    _ = stopped => {
                        tracing::debug!("Signal watcher released");
                    }
                }
                Ok::<(), ActorError>(())
            },
            move |_| shutdown.trigger(),
        )
    }
}

impl Default for SignalWatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve on ctrl-c, or on SIGTERM where available.
async fn terminate_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::group::Group;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn signal_ends_the_group_cleanly() {
        let (fire, fired) = oneshot::channel::<()>();
        let watcher = SignalWatcher::from_future(async move {
            let _ = fired.await;
            Ok::<(), std::io::Error>(())
        });

        let mut group = Group::new();
        group.add(watcher.into_actor());

        let run = tokio::spawn(group.run());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!run.is_finished());

        fire.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(1), run)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn failed_install_is_reported() {
        let watcher = SignalWatcher::from_future(async {
            Err::<(), _>(std::io::Error::other("no signals here"))
        });

        let mut group = Group::new();
        group.add(watcher.into_actor());
        let err = group.run().await.unwrap_err();
        assert_eq!(err.to_string(), "no signals here");
    }
}
