//! Actor group behavior.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ramme::lifecycle::{Actor, ActorError, Group, SignalWatcher};
use tokio::sync::oneshot;

mod common;
use common::{blocking_actor, finishing_actor};

#[tokio::test]
async fn first_failure_stops_everyone_with_that_error() {
    let (a, a_log) = blocking_actor("a");
    let (b, b_log) = finishing_actor("b", Duration::from_millis(50), Err("listener died"));
    let (c, c_log) = blocking_actor("c");

    let mut group = Group::new();
    group.add(a);
    group.add(b);
    group.add(c);

    let err = tokio::time::timeout(Duration::from_secs(5), group.run())
        .await
        .expect("group should stop")
        .unwrap_err();
    assert_eq!(err.to_string(), "listener died");

    for log in [&a_log, &b_log, &c_log] {
        assert_eq!(log.calls(), 1);
        assert_eq!(log.errors(), vec![Some("listener died".to_string())]);
    }
}

#[tokio::test]
async fn signal_first_returns_ok_and_stops_listeners() {
    let (fire, fired) = oneshot::channel::<()>();
    let signals = SignalWatcher::from_future(async move {
        let _ = fired.await;
        Ok::<(), std::io::Error>(())
    });

    let (grpc, grpc_log) = blocking_actor("grpc");
    let (http, http_log) = blocking_actor("http");
    let (admin, admin_log) = blocking_actor("http-admin");

    let mut group = Group::new();
    group.add(grpc);
    group.add(http);
    group.add(admin);
    group.add(signals.into_actor());

    let run = tokio::spawn(group.run());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!run.is_finished());

    fire.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("group should stop")
        .unwrap();
    assert!(result.is_ok());

    for log in [&grpc_log, &http_log, &admin_log] {
        assert_eq!(log.calls(), 1);
        assert_eq!(log.errors(), vec![None]);
    }
}

#[tokio::test]
async fn clean_exit_still_stops_the_group() {
    let (worker, _) = finishing_actor("one-shot", Duration::from_millis(10), Ok(()));
    let (listener, listener_log) = blocking_actor("listener");

    let mut group = Group::new();
    group.add(worker);
    group.add(listener);

    let result = tokio::time::timeout(Duration::from_secs(5), group.run())
        .await
        .expect("group should stop");
    assert!(result.is_ok());
    assert_eq!(listener_log.calls(), 1);
}

#[tokio::test]
async fn run_waits_for_slow_stoppers() {
    let finished = Arc::new(AtomicBool::new(false));
    let (release, released) = oneshot::channel::<()>();

    let done = finished.clone();
    let slow = Actor::new(
        "slow",
        async move {
            let _ = released.await;
            tokio::time::sleep(Duration::from_millis(100)).await;
            done.store(true, Ordering::SeqCst);
            Ok::<(), ActorError>(())
        },
        move |_| {
            let _ = release.send(());
        },
    );
    let (trigger, _) = finishing_actor("trigger", Duration::from_millis(10), Err("bye"));

    let mut group = Group::new();
    group.add(slow);
    group.add(trigger);

    let err = group.run().await.unwrap_err();
    assert_eq!(err.to_string(), "bye");
    assert!(finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn grace_period_aborts_stubborn_actors() {
    let stubborn_stops = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counted = stubborn_stops.clone();
    let stubborn = Actor::new(
        "stubborn",
        async {
            std::future::pending::<()>().await;
            Ok::<(), ActorError>(())
        },
        move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
        },
    );
    let (trigger, _) = finishing_actor("trigger", Duration::from_millis(10), Err("fatal"));

    let mut group = Group::new().with_shutdown_timeout(Duration::from_millis(200));
    group.add(stubborn);
    group.add(trigger);

    let started = Instant::now();
    let err = tokio::time::timeout(Duration::from_secs(5), group.run())
        .await
        .expect("grace period should bound the run")
        .unwrap_err();

    assert_eq!(err.to_string(), "fatal");
    assert_eq!(stubborn_stops.load(Ordering::SeqCst), 1);
    assert!(started.elapsed() >= Duration::from_millis(200));
}
