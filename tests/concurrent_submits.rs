#![cfg(unix)]

mod common;

use std::collections::HashSet;
use std::time::Duration;

use common::{fast_manager_options, init_tracing, RecordingObserver, TaskDetailBuilder};

use procherd::manager::TaskManager;
use procherd::outcome::Outcome;
use tokio::task::JoinSet;

const TASKS: usize = 50;

#[tokio::test]
async fn concurrent_submissions_get_distinct_ids() {
    init_tracing();
    let observer = RecordingObserver::new();
    let manager = TaskManager::start(observer, fast_manager_options()).unwrap();

    let mut join_set = JoinSet::new();
    for i in 0..TASKS {
        let manager = manager.clone();
        join_set.spawn(async move {
            let detail = TaskDetailBuilder::new("sleep 30")
                .name(&format!("worker-{i}"))
                .build();
            manager.submit_within(detail, Duration::from_secs(1)).await
        });
    }

    let mut ids = HashSet::new();
    while let Some(result) = join_set.join_next().await {
        let report = result.expect("submission task panicked");
        assert_eq!(report.outcome, Outcome::Success, "{}", report.message);
        assert!(ids.insert(report.value.unwrap()), "task id handed out twice");
    }

    assert_eq!(ids.len(), TASKS);
    assert_eq!(manager.all_task_ids().len(), TASKS);

    // Concurrent cancels tear everything down again.
    let mut cancels = JoinSet::new();
    for task_id in manager.all_task_ids() {
        let manager = manager.clone();
        cancels.spawn(async move { manager.cancel(&task_id).await });
    }
    while let Some(result) = cancels.join_next().await {
        let report = result.expect("cancel task panicked");
        assert_eq!(report.outcome, Outcome::Success, "{}", report.message);
    }
    assert!(manager.all_task_ids().is_empty());

    manager.shutdown().await;
}

#[tokio::test]
async fn submissions_for_different_tasks_do_not_serialize() {
    init_tracing();
    let observer = RecordingObserver::new();
    let manager = TaskManager::start(observer, fast_manager_options()).unwrap();

    // Each submission holds only its own key's lock, so a small budget is
    // plenty even when they all run at once.
    let started = tokio::time::Instant::now();
    let mut join_set = JoinSet::new();
    for i in 0..10 {
        let manager = manager.clone();
        join_set.spawn(async move {
            let detail = TaskDetailBuilder::new("sleep 30")
                .name(&format!("parallel-{i}"))
                .build();
            manager.submit_within(detail, Duration::from_millis(500)).await
        });
    }
    while let Some(result) = join_set.join_next().await {
        assert_eq!(result.unwrap().outcome, Outcome::Success);
    }
    assert!(started.elapsed() < Duration::from_secs(5));

    for task_id in manager.all_task_ids() {
        manager.cancel(&task_id).await;
    }
    manager.shutdown().await;
}
