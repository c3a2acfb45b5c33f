use log::LevelFilter;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use sweeper::PeriodicTask;
use tokio_util::sync::CancellationToken;

fn setup_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(LevelFilter::Debug)
        .try_init();
}

#[tokio::test]
async fn test_periodic_task_runs_on_interval() {
    setup_logger();

    let shutdown = CancellationToken::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = Arc::clone(&counter);

    let task = PeriodicTask::spawn(
        "counter",
        Duration::from_millis(20),
        &shutdown,
        move || {
            let counter = Arc::clone(&counter_clone);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        },
    );

    tokio::time::sleep(Duration::from_millis(110)).await;

    let runs = counter.load(Ordering::SeqCst);
    assert!(runs >= 3, "expected at least 3 runs, got {}", runs);
    assert_eq!(task.runs(), runs);
    assert_eq!(task.failures(), 0);
}

#[tokio::test]
async fn test_periodic_task_stops_on_shared_shutdown() {
    setup_logger();

    let shutdown = CancellationToken::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = Arc::clone(&counter);

    let task = PeriodicTask::spawn(
        "cancellable",
        Duration::from_millis(10),
        &shutdown,
        move || {
            let counter = Arc::clone(&counter_clone);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        },
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.cancel();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(task.is_cancelled());

    let runs_at_cancel = counter.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        counter.load(Ordering::SeqCst),
        runs_at_cancel,
        "task kept running after shutdown"
    );
}

#[tokio::test]
async fn test_periodic_task_survives_callback_errors() {
    setup_logger();

    let shutdown = CancellationToken::new();
    let task = PeriodicTask::spawn(
        "flaky",
        Duration::from_millis(10),
        &shutdown,
        move || async move { Err("boom".to_string()) },
    );

    tokio::time::sleep(Duration::from_millis(60)).await;

    assert!(task.runs() >= 3, "task stopped after a failure");
    assert_eq!(task.failures(), task.runs());
}

#[tokio::test]
async fn test_periodic_task_cancelled_on_drop() {
    setup_logger();

    let shutdown = CancellationToken::new();
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = Arc::clone(&counter);

    let task = PeriodicTask::spawn(
        "dropped",
        Duration::from_millis(10),
        &shutdown,
        move || {
            let counter = Arc::clone(&counter_clone);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        },
    );

    tokio::time::sleep(Duration::from_millis(40)).await;
    drop(task);
    tokio::time::sleep(Duration::from_millis(20)).await;

    let runs_at_drop = counter.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(counter.load(Ordering::SeqCst), runs_at_drop);
    // Dropping one task must not cancel the shared shutdown token
    assert!(!shutdown.is_cancelled());
}
