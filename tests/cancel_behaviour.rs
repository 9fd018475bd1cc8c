#![cfg(unix)]

mod common;

use std::time::Duration;

use common::{fast_manager_options, init_tracing, RecordingObserver, TaskDetailBuilder};

use procherd::manager::TaskManager;
use procherd::outcome::Outcome;

#[tokio::test]
async fn cancel_stops_and_unregisters_a_running_task() {
    init_tracing();
    let observer = RecordingObserver::new();
    let manager = TaskManager::start(observer, fast_manager_options()).unwrap();

    let report = manager
        .submit(TaskDetailBuilder::new("sleep 30").name("long").build())
        .await;
    assert_eq!(report.outcome, Outcome::Success);
    let task_id = report.value.unwrap();

    let cancelled = manager.cancel(&task_id).await;
    assert_eq!(cancelled.outcome, Outcome::Success);
    assert!(manager.all_task_ids().is_empty());

    // A second cancel of the same id now misses.
    let again = manager.cancel(&task_id).await;
    assert_eq!(again.outcome, Outcome::InvalidId);

    manager.shutdown().await;
}

#[tokio::test]
async fn stubborn_task_times_out_then_a_retry_kills_it() {
    init_tracing();
    let observer = RecordingObserver::new();
    let manager = TaskManager::start(observer, fast_manager_options()).unwrap();

    // The child ignores the polite termination request.
    let detail = TaskDetailBuilder::new(r#"sh -c 'trap "" TERM; while true; do sleep 0.1; done'"#)
        .name("stubborn")
        .build();
    let report = manager.submit(detail).await;
    assert_eq!(report.outcome, Outcome::Success);
    let task_id = report.value.unwrap();

    // Too little budget for a child that shrugs off the first request.
    let first = manager
        .cancel_within(&task_id, Duration::from_millis(200))
        .await;
    assert_eq!(first.outcome, Outcome::Timeout);

    // The task stays registered after a timed-out cancel.
    assert_eq!(manager.all_task_ids(), vec![task_id.clone()]);

    // The retry escalates to a forceful kill and succeeds.
    let second = manager
        .cancel_within(&task_id, Duration::from_secs(5))
        .await;
    assert_eq!(second.outcome, Outcome::Success);
    assert!(manager.all_task_ids().is_empty());

    manager.shutdown().await;
}

#[tokio::test]
async fn cancelled_task_is_not_restarted() {
    init_tracing();
    let observer = RecordingObserver::new();
    let manager = TaskManager::start(observer.clone(), fast_manager_options()).unwrap();

    let report = manager
        .submit(TaskDetailBuilder::new("sleep 30").name("short-lived").build())
        .await;
    let task_id = report.value.unwrap();

    let cancelled = manager.cancel(&task_id).await;
    assert_eq!(cancelled.outcome, Outcome::Success);

    // Give the watchdog a few cycles; a cancelled task must never come back.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(manager.all_task_ids().is_empty());
    assert!(!observer.events().iter().any(|e| e.is_restart()));

    manager.shutdown().await;
}
