// src/task/process.rs

//! A task's view over its current child process.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::exec::{ExitOutcome, ExternalProcess, ProcessSpawner};
use crate::outcome::Report;
use crate::task::detail::TaskDetail;

/// One supervised task: its immutable definition plus a replaceable slot for
/// the current [`ExternalProcess`] (absent before the first spawn, swapped
/// wholesale on restart).
///
/// The definition is the immutable surface and may be read concurrently
/// without any lock. Everything else is the mutable surface: callers reach it
/// only through the registry's `MapEntry`, which guarantees the per-key lock
/// is held.
pub struct TaskProcess {
    detail: TaskDetail,
    spawner: Arc<ProcessSpawner>,
    child: Mutex<Option<ExternalProcess>>,
    completion_reported: AtomicBool,
}

impl std::fmt::Debug for TaskProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskProcess")
            .field("name", &self.detail.name())
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}

impl TaskProcess {
    pub fn new(detail: TaskDetail, spawner: Arc<ProcessSpawner>) -> Self {
        Self {
            detail,
            spawner,
            child: Mutex::new(None),
            completion_reported: AtomicBool::new(false),
        }
    }

    pub fn detail(&self) -> &TaskDetail {
        &self.detail
    }

    fn current(&self) -> Option<ExternalProcess> {
        self.child.lock().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.current().is_some_and(|p| p.is_finished())
    }

    pub fn is_running(&self) -> bool {
        self.current().is_some_and(|p| p.is_running())
    }

    pub fn destroy(&self) {
        if let Some(process) = self.current() {
            process.destroy();
        }
    }

    /// Wait until the current child is finished or `budget` elapses; returns
    /// `is_finished()` at the moment of return. With no child yet, there is
    /// nothing to wait on.
    pub async fn wait_for(&self, budget: Duration) -> bool {
        match self.current() {
            Some(process) => process.wait_for(budget).await,
            None => false,
        }
    }

    /// Exit status of the current child; `Some` only once it is finished.
    pub fn exit_outcome(&self) -> Option<ExitOutcome> {
        self.current().and_then(|p| p.exit_outcome())
    }

    /// Stop the current child (if any) and start a fresh one.
    ///
    /// The previous child is destroyed and waited for up to `budget`; if it
    /// is still running afterwards the restart fails without spawning. A
    /// spawn failure propagates the adapter's message unchanged and leaves
    /// the slot untouched. On success the slot is swapped and the
    /// completion-reported mark is cleared for the new child.
    ///
    /// Must only be invoked while holding the task's per-key lock.
    pub async fn restart(&self, budget: Duration) -> Report {
        if let Some(previous) = self.current() {
            previous.destroy();
            previous.wait_for(budget).await;
            if previous.is_running() {
                return Report::failure("Failed to stop previous process");
            }
        }

        match self
            .spawner
            .spawn(self.detail.command(), self.detail.directory())
        {
            Ok(process) => {
                *self.child.lock() = Some(process);
                self.completion_reported.store(false, Ordering::SeqCst);
                Report::success()
            }
            Err(err) => Report::failure(err.to_string()),
        }
    }

    /// Whether the watchdog has already delivered `on_complete` for the
    /// current child. Kept per child: a successful restart clears it.
    pub fn completion_reported(&self) -> bool {
        self.completion_reported.load(Ordering::SeqCst)
    }

    pub fn mark_completion_reported(&self) {
        self.completion_reported.store(true, Ordering::SeqCst);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::task::detail::TaskType;

    fn task(command: &str) -> TaskProcess {
        let detail = TaskDetail::new("t", command, ".", TaskType::Repeater).unwrap();
        TaskProcess::new(detail, Arc::new(ProcessSpawner::new()))
    }

    #[tokio::test]
    async fn first_restart_spawns_the_child() {
        let task = task("sh -c 'exit 0'");
        assert!(!task.is_running());
        let report = task.restart(Duration::from_secs(1)).await;
        assert!(report.is_success(), "{}", report.message);
        assert!(task.wait_for(Duration::from_secs(5)).await);
        assert_eq!(task.exit_outcome().map(|o| o.code), Some(0));
    }

    #[tokio::test]
    async fn restart_replaces_a_finished_child() {
        let task = task("sh -c 'exit 1'");
        task.restart(Duration::from_secs(1)).await;
        task.wait_for(Duration::from_secs(5)).await;
        task.mark_completion_reported();

        let report = task.restart(Duration::from_secs(5)).await;
        assert!(report.is_success(), "{}", report.message);
        assert!(!task.completion_reported(), "new child is unreported");
        task.wait_for(Duration::from_secs(5)).await;
    }

    #[tokio::test]
    async fn spawn_failure_keeps_the_previous_child() {
        let detail = TaskDetail::new(
            "bad",
            "no-such-binary-procherd-test",
            ".",
            TaskType::Repeater,
        )
        .unwrap();
        let task = TaskProcess::new(detail, Arc::new(ProcessSpawner::new()));
        let report = task.restart(Duration::from_secs(1)).await;
        assert!(!report.is_success());
        assert!(!report.message.is_empty());
        assert!(task.current().is_none());
    }

    #[tokio::test]
    async fn restart_stops_a_running_child_first() {
        let task = task("sleep 30");
        task.restart(Duration::from_secs(1)).await;
        assert!(task.is_running());
        let report = task.restart(Duration::from_secs(5)).await;
        assert!(report.is_success(), "{}", report.message);
        task.destroy();
        task.wait_for(Duration::from_secs(5)).await;
    }
}
