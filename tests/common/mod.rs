//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ramme::lifecycle::{Actor, ActorError, Shutdown};

/// What an actor's stop callback observed.
#[derive(Clone, Default)]
pub struct StopLog {
    calls: Arc<AtomicUsize>,
    errors: Arc<Mutex<Vec<Option<String>>>>,
}

impl StopLog {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn errors(&self) -> Vec<Option<String>> {
        self.errors.lock().unwrap().clone()
    }

    fn record(&self, err: Option<&ActorError>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.errors.lock().unwrap().push(err.map(|e| e.to_string()));
    }
}

/// An actor whose start blocks until its stop is called.
pub fn blocking_actor(name: &str) -> (Actor, StopLog) {
    let log = StopLog::default();
    let shutdown = Shutdown::new();
    let stopped = shutdown.wait();
    let stop_log = log.clone();

    let actor = Actor::new(
        name,
        async move {
            stopped.await;
            Ok::<(), ActorError>(())
        },
        move |err| {
            stop_log.record(err);
            shutdown.trigger();
        },
    );
    (actor, log)
}

/// An actor whose start returns `outcome` after `delay`.
pub fn finishing_actor(
    name: &str,
    delay: Duration,
    outcome: Result<(), &'static str>,
) -> (Actor, StopLog) {
    let log = StopLog::default();
    let stop_log = log.clone();

    let actor = Actor::new(
        name,
        async move {
            tokio::time::sleep(delay).await;
            outcome.map_err(ActorError::from)
        },
        move |err| stop_log.record(err),
    );
    (actor, log)
}

/// Poll `url` until it answers or the deadline passes.
pub async fn wait_until_up(url: &str) {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    for _ in 0..100 {
        if client.get(url).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("{} never came up", url);
}
