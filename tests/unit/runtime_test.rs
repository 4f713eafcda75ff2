//! Tests for tokio spawner and async ticker

use std::sync::Arc;
use std::time::Duration;

use aging_scheduler::core::Spawn;
use aging_scheduler::runtime::tokio_spawner::TokioSpawner;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_spawn() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
}

#[tokio::test]
async fn test_tokio_spawner_current() {
    assert!(TokioSpawner::current().is_some());
}

#[test]
fn test_tokio_spawner_current_outside_runtime() {
    assert!(TokioSpawner::current().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_async_ticker_runs_until_shutdown() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let spawner = TokioSpawner::current().expect("inside runtime");
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ticks);
    let mut handle = aging_scheduler::core::ticker::spawn_async_ticker(
        &spawner,
        Duration::from_millis(5),
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    );

    tokio::time::sleep(Duration::from_millis(80)).await;
    handle.shutdown();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let stopped_at = ticks.load(Ordering::SeqCst);
    assert!(stopped_at >= 1);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), stopped_at);
}
