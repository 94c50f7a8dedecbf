//! Background sweeper behavior.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::TestHandler;
use muxpool::{Router, RouterConfig, Shutdown, Sweeper};

#[tokio::test]
async fn test_sweeper_expires_overdue_calls() {
    let handler = TestHandler::new();
    let router = Arc::new(Router::new(Arc::clone(&handler), &RouterConfig::default()));
    router.add_endpoint(&"a".to_string());

    let shutdown = Shutdown::new();
    let task = Sweeper::spawn(
        Arc::clone(&router),
        Duration::from_millis(10),
        &shutdown,
    );

    router
        .get(1, "task-1".to_string(), Some(Duration::from_millis(20)))
        .unwrap();

    // No manual cleanup: the background sweeper must expire the call.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(handler.timeouts(), vec![(1, Some("task-1".to_string()))]);
    assert!(router.put(&1, 0).is_none());

    shutdown.trigger();
    task.await.unwrap();
}

#[tokio::test]
async fn test_sweeper_exits_on_shutdown_signal() {
    let handler = TestHandler::new();
    let router = Arc::new(Router::new(Arc::clone(&handler), &RouterConfig::default()));

    let shutdown = Shutdown::new();
    let task = Sweeper::spawn(
        Arc::clone(&router),
        Duration::from_millis(10),
        &shutdown,
    );

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("sweeper did not exit on shutdown")
        .unwrap();
}

#[tokio::test]
async fn test_sweeper_spawned_after_trigger_exits_immediately() {
    let handler = TestHandler::new();
    let router = Arc::new(Router::new(Arc::clone(&handler), &RouterConfig::default()));

    let shutdown = Shutdown::new();
    shutdown.trigger();

    // The signal is latched, so a sweeper spawned late must still see it.
    let task = Sweeper::spawn(
        Arc::clone(&router),
        Duration::from_millis(10),
        &shutdown,
    );
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("late-spawned sweeper did not observe latched shutdown")
        .unwrap();
}

#[tokio::test]
async fn test_completed_calls_are_untouched_by_sweeps() {
    let handler = TestHandler::new();
    let router = Arc::new(Router::new(Arc::clone(&handler), &RouterConfig::default()));
    router.add_endpoint(&"a".to_string());

    let shutdown = Shutdown::new();
    let task = Sweeper::spawn(
        Arc::clone(&router),
        Duration::from_millis(10),
        &shutdown,
    );

    router
        .get(1, "task-1".to_string(), Some(Duration::from_secs(30)))
        .unwrap();
    assert_eq!(router.put(&1, 0).unwrap(), "task-1");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(handler.timeouts().is_empty());

    shutdown.trigger();
    task.await.unwrap();
}
