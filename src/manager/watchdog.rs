// src/manager/watchdog.rs

//! Periodic watchdog: detects finished children, delivers completion events,
//! removes one-shots and restarts repeaters.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::manager::observer::RobustObserver;
use crate::registry::TaskProcessMap;
use crate::task::{TaskResult, TaskType};

/// Single periodic worker with fixed delay between cycles.
///
/// Each cycle is a two-phase pass: first detect completions (delivering
/// `on_complete` and collecting repeaters), then, after a short pause with no
/// lock held, restart the collected repeaters. A failed restart leaves the
/// entry in *finished* state, so the next cycle retries it.
pub(crate) struct Watchdog {
    pub map: Arc<TaskProcessMap>,
    pub observer: RobustObserver,
    pub period: Duration,
    pub restart_pause: Duration,
    pub cycle_budget: Duration,
    pub shutdown: CancellationToken,
}

impl Watchdog {
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            debug!(period = ?self.period, "watchdog started");
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    _ = tokio::time::sleep(self.period) => {}
                }
                self.cycle().await;
            }
            debug!("watchdog stopped");
        })
    }

    async fn cycle(&self) {
        let task_ids = self.map.view().task_ids();

        let mut to_restart = Vec::new();
        for task_id in task_ids {
            if self.detect_completion(&task_id).await {
                to_restart.push(task_id);
            }
        }
        if to_restart.is_empty() {
            return;
        }

        tokio::select! {
            _ = self.shutdown.cancelled() => return,
            _ = tokio::time::sleep(self.restart_pause) => {}
        }

        for task_id in to_restart {
            self.restart_repeater(&task_id).await;
        }
    }

    /// Completion pass for one task. Returns true iff the task is a repeater
    /// that needs a restart.
    async fn detect_completion(&self, task_id: &str) -> bool {
        let observer = self.observer.clone();
        let result = self
            .map
            .run_under_key(task_id, self.cycle_budget, move |_, entry, _| async move {
                let Some(process) = entry.mutable() else {
                    return false;
                };
                if !process.is_finished() {
                    return false;
                }
                let detail = process.detail().clone();

                // Deliver on_complete exactly once per child; a repeater whose
                // restart keeps failing stays eligible for retry without
                // repeating the event.
                if !process.completion_reported() {
                    let Some(exit) = process.exit_outcome() else {
                        return false;
                    };
                    let task_result = TaskResult {
                        exit_code: exit.code,
                        exit_message: exit.message,
                    };
                    observer.on_complete(entry.key(), &detail, &task_result).await;
                    process.mark_completion_reported();
                }

                if detail.task_type() == TaskType::Repeater {
                    true
                } else {
                    entry.remove();
                    false
                }
            })
            .await;

        match result {
            Ok(needs_restart) => needs_restart,
            Err(err) => {
                warn!(task_id, error = %err, "completion check skipped this cycle");
                false
            }
        }
    }

    async fn restart_repeater(&self, task_id: &str) {
        let observer = self.observer.clone();
        let result = self
            .map
            .run_under_key(
                task_id,
                self.cycle_budget,
                move |_, entry, remaining| async move {
                    let Some(process) = entry.mutable() else {
                        return;
                    };
                    if !process.is_finished() {
                        return;
                    }
                    let detail = process.detail().clone();
                    let report = process.restart(remaining).await;
                    if report.is_success() {
                        observer.on_restart(entry.key(), &detail).await;
                    } else {
                        warn!(
                            task_id = entry.key(),
                            message = %report.message,
                            "restart failed; entry left in place for the next cycle"
                        );
                    }
                },
            )
            .await;

        if let Err(err) = result {
            warn!(task_id, error = %err, "restart skipped this cycle");
        }
    }
}
