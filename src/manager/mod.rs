// src/manager/mod.rs

//! Task manager: the public supervision surface.
//!
//! Every fallible operation comes in two flavors sharing one implementation:
//! the quiet flavor reports a fired shutdown as `Outcome::Interrupted` inside
//! the envelope, the loud (`try_*`) flavor returns `Err(Interrupted)`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::errors::{Result, SupervisorError};
use crate::exec::ProcessSpawner;
use crate::outcome::{Report, ValueReport};
use crate::registry::TaskProcessMap;
use crate::task::{TaskDetail, TaskIdGenerator, TaskProcess};

pub mod observer;
pub mod watchdog;

pub use observer::{ConsoleObserver, TaskObserver};

use observer::RobustObserver;
use watchdog::Watchdog;

/// The operation's worker observed supervisor shutdown before completion.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("operation interrupted by supervisor shutdown")]
pub struct Interrupted;

/// Construction-time knobs.
#[derive(Debug, Clone, Copy)]
pub struct TaskManagerOptions {
    /// Time budget applied to operations without an explicit one. Must be
    /// strictly positive.
    pub default_budget: Duration,
    /// Fixed delay between watchdog cycles.
    pub watchdog_period: Duration,
    /// Pause between the watchdog's detect and restart phases, held with no
    /// lock taken.
    pub restart_pause: Duration,
}

impl Default for TaskManagerOptions {
    fn default() -> Self {
        Self {
            default_budget: Duration::from_secs(60 * 60),
            watchdog_period: Duration::from_secs(1),
            restart_pause: Duration::from_secs(1),
        }
    }
}

/// Supervisor of external task processes.
///
/// Owns the task registry and the watchdog worker; dispatches completion and
/// restart events to the configured observer.
pub struct TaskManager {
    map: Arc<TaskProcessMap>,
    ids: TaskIdGenerator,
    spawner: Arc<ProcessSpawner>,
    options: TaskManagerOptions,
    shutdown: CancellationToken,
    watchdog: Mutex<Option<JoinHandle<()>>>,
}

impl TaskManager {
    /// Build a manager and start its watchdog.
    pub fn start(
        observer: Arc<dyn TaskObserver>,
        options: TaskManagerOptions,
    ) -> Result<Arc<Self>> {
        if options.default_budget.is_zero() {
            return Err(SupervisorError::ConfigError(
                "default time budget must be strictly positive".to_string(),
            ));
        }

        let map = Arc::new(TaskProcessMap::new());
        let shutdown = CancellationToken::new();
        let robust = RobustObserver::new(observer);

        let watchdog = Watchdog {
            map: Arc::clone(&map),
            observer: robust,
            period: options.watchdog_period,
            restart_pause: options.restart_pause,
            cycle_budget: options.default_budget,
            shutdown: shutdown.child_token(),
        }
        .spawn();

        Ok(Arc::new(Self {
            map,
            ids: TaskIdGenerator::new(),
            spawner: Arc::new(ProcessSpawner::new()),
            options,
            shutdown,
            watchdog: Mutex::new(Some(watchdog)),
        }))
    }

    /// Stop the watchdog and interrupt in-flight operations. Registered
    /// tasks are left as they are; cancel them first for a clean teardown.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let handle = self.watchdog.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        info!("task manager shut down");
    }

    /// Snapshot of the currently registered task ids.
    pub fn all_task_ids(&self) -> Vec<String> {
        self.map.view().task_ids()
    }

    /// Read-only lookup of a task's definition.
    pub fn get_task_detail(&self, task_id: &str) -> ValueReport<TaskDetail> {
        match self.map.view().get(task_id) {
            Some(view) => ValueReport::success(view.detail().clone()),
            None => ValueReport::invalid_id(format!(
                "there is no task associated with '{task_id}'"
            )),
        }
    }

    /// Submit a task with the default budget (quiet flavor).
    pub async fn submit(&self, detail: TaskDetail) -> ValueReport<String> {
        self.submit_within(detail, self.options.default_budget).await
    }

    /// Submit a task (quiet flavor): interruption surfaces in the envelope.
    pub async fn submit_within(&self, detail: TaskDetail, budget: Duration) -> ValueReport<String> {
        match self.try_submit_within(detail, budget).await {
            Ok(report) => report,
            Err(err) => ValueReport::interrupted(err.to_string()),
        }
    }

    /// Submit a task with the default budget (loud flavor).
    pub async fn try_submit(&self, detail: TaskDetail) -> std::result::Result<ValueReport<String>, Interrupted> {
        self.try_submit_within(detail, self.options.default_budget).await
    }

    /// Submit a task (loud flavor): interruption is an `Err`.
    ///
    /// A fresh task id is generated; under its per-key lock the task process
    /// is built and its first spawn performed. On spawn failure no entry is
    /// created and the adapter's message is returned as *failure*.
    pub async fn try_submit_within(
        &self,
        detail: TaskDetail,
        budget: Duration,
    ) -> std::result::Result<ValueReport<String>, Interrupted> {
        tokio::select! {
            // Fired shutdown wins over an operation that is also ready.
            biased;
            _ = self.shutdown.cancelled() => Err(Interrupted),
            report = self.submit_inner(detail, budget) => Ok(report),
        }
    }

    async fn submit_inner(&self, detail: TaskDetail, budget: Duration) -> ValueReport<String> {
        let task_id = self.ids.next_id();
        debug!(task_id, name = detail.name(), "submitting task");

        let spawner = Arc::clone(&self.spawner);
        let id = task_id.clone();
        let result = self
            .map
            .run_under_key(&task_id, budget, move |_, entry, remaining| async move {
                if entry.is_present() {
                    return ValueReport::invalid_id(format!(
                        "task id '{id}' is already present"
                    ));
                }

                let process = TaskProcess::new(detail, spawner);
                let report = process.restart(remaining).await;
                if !report.is_success() {
                    return ValueReport::failure(report.message);
                }

                entry.replace(Arc::new(process));
                ValueReport::success(id)
            })
            .await;

        match result {
            Ok(report) => report,
            Err(err) => ValueReport::timeout(err.to_string()),
        }
    }

    /// Cancel a task with the default budget (quiet flavor).
    pub async fn cancel(&self, task_id: &str) -> Report {
        self.cancel_within(task_id, self.options.default_budget).await
    }

    /// Cancel a task (quiet flavor): interruption surfaces in the envelope.
    pub async fn cancel_within(&self, task_id: &str, budget: Duration) -> Report {
        match self.try_cancel_within(task_id, budget).await {
            Ok(report) => report,
            Err(err) => Report::interrupted(err.to_string()),
        }
    }

    /// Cancel a task with the default budget (loud flavor).
    pub async fn try_cancel(&self, task_id: &str) -> std::result::Result<Report, Interrupted> {
        self.try_cancel_within(task_id, self.options.default_budget).await
    }

    /// Cancel a task (loud flavor): interruption is an `Err`.
    ///
    /// On *timeout* the entry is left in place and the cancel may be retried;
    /// the retry escalates the destroy request to a forceful kill.
    pub async fn try_cancel_within(
        &self,
        task_id: &str,
        budget: Duration,
    ) -> std::result::Result<Report, Interrupted> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(Interrupted),
            report = self.cancel_inner(task_id, budget) => Ok(report),
        }
    }

    async fn cancel_inner(&self, task_id: &str, budget: Duration) -> Report {
        // Fast existence check without taking any lock.
        if !self.map.view().contains(task_id) {
            return Report::invalid_id(format!(
                "there is no task associated with '{task_id}'"
            ));
        }

        let result = self
            .map
            .run_under_key(task_id, budget, move |_, entry, remaining| async move {
                let Some(process) = entry.mutable() else {
                    return Report::invalid_id(format!(
                        "there is no task associated with '{}'",
                        entry.key()
                    ));
                };

                process.destroy();
                process.wait_for(remaining).await;
                if !process.is_finished() {
                    return Report::timeout(format!(
                        "task '{}' is still running after the wait",
                        entry.key()
                    ));
                }

                entry.remove();
                Report::success()
            })
            .await;

        match result {
            Ok(report) => report,
            Err(err) => Report::timeout(err.to_string()),
        }
    }
}
