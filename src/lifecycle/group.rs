//! Actor group: run everything, stop everything when anything stops.
//!
//! Each registered [`Actor`] pairs a long-running `start` future with a
//! non-blocking `stop` callback. [`Group::run`] spawns every start on its own
//! task and waits for the first one to finish. Whatever that start returned,
//! `Ok` or `Err`, becomes the result of the run: every actor's stop is called
//! exactly once with that outcome, the remaining starts are awaited, and the
//! outcome is handed back to the caller.
//!
//! Every actor is essential. An actor that finishes cleanly still takes the
//! rest of the group down with it.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use thiserror::Error;
use tokio::task::JoinSet;

/// Error type produced by actor start routines.
pub type ActorError = Box<dyn std::error::Error + Send + Sync + 'static>;

type StopFn = Box<dyn FnOnce(Option<&ActorError>) + Send + 'static>;

/// A start routine panicked instead of returning.
#[derive(Debug, Error)]
#[error("actor {name} panicked: {message}")]
pub struct ActorPanicked {
    pub name: String,
    pub message: String,
}

/// A named start/stop pair.
pub struct Actor {
    name: String,
    start: BoxFuture<'static, Result<(), ActorError>>,
    stop: StopFn,
}

impl Actor {
    /// Build an actor.
    ///
    /// `stop` must make `start` return promptly and must not block. It
    /// receives the error that ended the run, if any.
    pub fn new<F, S>(name: impl Into<String>, start: F, stop: S) -> Self
    where
        F: Future<Output = Result<(), ActorError>> + Send + 'static,
        S: FnOnce(Option<&ActorError>) + Send + 'static,
    {
        Self {
            name: name.into(),
            start: Box::pin(start),
            stop: Box::new(stop),
        }
    }
}

impl std::fmt::Debug for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actor").field("name", &self.name).finish()
    }
}

/// A set of actors that live and die together.
#[derive(Debug, Default)]
pub struct Group {
    actors: Vec<Actor>,
    shutdown_timeout: Option<Duration>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound how long `run` waits for starts to return once stops were sent.
    ///
    /// Starts still running after the grace period are aborted. Without a
    /// grace period `run` waits for as long as it takes.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = Some(timeout);
        self
    }

    /// Register an actor.
    pub fn add(&mut self, actor: Actor) {
        self.actors.push(actor);
    }

    /// Run all actors until the first one returns, then stop the rest.
    ///
    /// Returns the outcome of the first start to finish.
    pub async fn run(self) -> Result<(), ActorError> {
        if self.actors.is_empty() {
            return Ok(());
        }

        let mut names = Vec::with_capacity(self.actors.len());
        let mut stops = Vec::with_capacity(self.actors.len());
        let mut tasks = JoinSet::new();

        for (index, actor) in self.actors.into_iter().enumerate() {
            let Actor { name, start, stop } = actor;
            let task_name = name.clone();
            tasks.spawn(async move {
                let outcome = AssertUnwindSafe(start).catch_unwind().await;
                (index, outcome.unwrap_or_else(|panic| Err(panicked(task_name, panic))))
            });
            names.push(name);
            stops.push(stop);
        }

        tracing::debug!(actors = names.len(), "Actor group running");

        let (index, result) = match tasks.join_next().await {
            Some(Ok(finished)) => finished,
            Some(Err(join_error)) => (usize::MAX, Err(join_error.into())),
            None => return Ok(()),
        };

        match &result {
            Ok(()) => tracing::info!(
                actor = names.get(index).map(String::as_str).unwrap_or("unknown"),
                "Actor finished, stopping group"
            ),
            Err(e) => tracing::error!(
                actor = names.get(index).map(String::as_str).unwrap_or("unknown"),
                error = %e,
                "Actor failed, stopping group"
            ),
        }

        for stop in stops {
            stop(result.as_ref().err());
        }

        match self.shutdown_timeout {
            Some(grace) => {
                if tokio::time::timeout(grace, drain(&mut tasks, &names)).await.is_err() {
                    tracing::warn!(
                        remaining = tasks.len(),
                        grace_period = ?grace,
                        "Actors did not stop in time, aborting"
                    );
                    tasks.shutdown().await;
                }
            }
            None => drain(&mut tasks, &names).await,
        }

        tracing::debug!("Actor group stopped");
        result
    }
}

/// Wait for every remaining start to return.
async fn drain(tasks: &mut JoinSet<(usize, Result<(), ActorError>)>, names: &[String]) {
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(()))) => tracing::debug!(actor = %names[index], "Actor stopped"),
            Ok((index, Err(e))) => {
                tracing::debug!(actor = %names[index], error = %e, "Actor stopped with error")
            }
            Err(e) => tracing::warn!(error = %e, "Actor task did not complete"),
        }
    }
}

fn panicked(name: String, panic: Box<dyn std::any::Any + Send>) -> ActorError {
    let message = if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    Box::new(ActorPanicked { name, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_group_returns_immediately() {
        assert!(Group::new().run().await.is_ok());
    }

    #[tokio::test]
    async fn single_actor_result_is_returned() {
        let mut group = Group::new();
        group.add(Actor::new(
            "failing",
            async { Err::<(), ActorError>("boom".into()) },
            |_| {},
        ));
        let err = group.run().await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    async fn explode() -> Result<(), ActorError> {
        panic!("exploded")
    }

    #[tokio::test]
    async fn panic_counts_as_failure() {
        let mut group = Group::new();
        group.add(Actor::new("panicky", explode(), |_| {}));
        let err = group.run().await.unwrap_err();
        let panicked = err.downcast_ref::<ActorPanicked>().unwrap();
        assert_eq!(panicked.name, "panicky");
        assert_eq!(panicked.message, "exploded");
    }
}
