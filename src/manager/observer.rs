// src/manager/observer.rs

//! Completion/restart event observers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::task::{TaskDetail, TaskResult};

/// Callback sink for task lifecycle events.
///
/// Implementations may fail; the manager only ever invokes observers through
/// [`RobustObserver`], so a failing callback is logged and never propagates
/// into supervision.
#[async_trait]
pub trait TaskObserver: Send + Sync {
    /// A task's child process has reached *finished*.
    async fn on_complete(
        &self,
        task_id: &str,
        detail: &TaskDetail,
        result: &TaskResult,
    ) -> anyhow::Result<()>;

    /// A repeater task has been restarted after completion.
    async fn on_restart(&self, task_id: &str, detail: &TaskDetail) -> anyhow::Result<()>;
}

/// Shield around a user observer: logs and swallows its errors.
#[derive(Clone)]
pub(crate) struct RobustObserver {
    inner: Arc<dyn TaskObserver>,
}

impl RobustObserver {
    pub fn new(inner: Arc<dyn TaskObserver>) -> Self {
        Self { inner }
    }

    pub async fn on_complete(&self, task_id: &str, detail: &TaskDetail, result: &TaskResult) {
        if let Err(err) = self.inner.on_complete(task_id, detail, result).await {
            error!(task_id, error = %err, "observer on_complete failed");
        }
    }

    pub async fn on_restart(&self, task_id: &str, detail: &TaskDetail) {
        if let Err(err) = self.inner.on_restart(task_id, detail).await {
            error!(task_id, error = %err, "observer on_restart failed");
        }
    }
}

/// Observer used by the CLI boundary: prints events to stdout.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

#[async_trait]
impl TaskObserver for ConsoleObserver {
    async fn on_complete(
        &self,
        task_id: &str,
        detail: &TaskDetail,
        result: &TaskResult,
    ) -> anyhow::Result<()> {
        println!(
            "Detected stopped task (taskId: {}; name: {}; exit code: {}; exit message: {})",
            task_id,
            detail.name(),
            result.exit_code,
            result.exit_message
        );
        Ok(())
    }

    async fn on_restart(&self, task_id: &str, detail: &TaskDetail) -> anyhow::Result<()> {
        println!(
            "Restarting stopped task (taskId: {}; name: {})",
            task_id,
            detail.name()
        );
        Ok(())
    }
}
