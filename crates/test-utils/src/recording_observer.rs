//! Observer that records every event it receives, for assertions in tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use procherd::manager::TaskObserver;
use procherd::task::{TaskDetail, TaskResult};

/// One recorded observer callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    Complete {
        task_id: String,
        name: String,
        exit_code: i32,
        exit_message: String,
    },
    Restart {
        task_id: String,
        name: String,
    },
}

impl ObservedEvent {
    pub fn task_id(&self) -> &str {
        match self {
            ObservedEvent::Complete { task_id, .. } => task_id,
            ObservedEvent::Restart { task_id, .. } => task_id,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ObservedEvent::Complete { .. })
    }

    pub fn is_restart(&self) -> bool {
        matches!(self, ObservedEvent::Restart { .. })
    }
}

/// A `TaskObserver` that appends events to a shared log.
///
/// Optionally fails every callback (`failing()`), to exercise the manager's
/// observer shielding.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
    notify: Notify,
    fail_callbacks: bool,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// An observer whose callbacks record the event and then return an error.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail_callbacks: true,
            ..Self::default()
        })
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().clone()
    }

    fn push(&self, event: ObservedEvent) {
        self.events.lock().push(event);
        self.notify.notify_waiters();
    }

    /// Wait until some recorded event matches `predicate`, or time out.
    pub async fn wait_for_event<F>(&self, timeout: Duration, predicate: F) -> bool
    where
        F: Fn(&ObservedEvent) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.events.lock().iter().any(&predicate) {
                return true;
            }
            let notified = self.notify.notified();
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.events.lock().iter().any(&predicate);
            }
        }
    }

    pub async fn wait_for_complete(&self, task_id: &str, timeout: Duration) -> bool {
        self.wait_for_event(timeout, |e| e.is_complete() && e.task_id() == task_id)
            .await
    }

    pub async fn wait_for_restart(&self, task_id: &str, timeout: Duration) -> bool {
        self.wait_for_event(timeout, |e| e.is_restart() && e.task_id() == task_id)
            .await
    }
}

#[async_trait]
impl TaskObserver for RecordingObserver {
    async fn on_complete(
        &self,
        task_id: &str,
        detail: &TaskDetail,
        result: &TaskResult,
    ) -> anyhow::Result<()> {
        self.push(ObservedEvent::Complete {
            task_id: task_id.to_string(),
            name: detail.name().to_string(),
            exit_code: result.exit_code,
            exit_message: result.exit_message.clone(),
        });
        if self.fail_callbacks {
            anyhow::bail!("observer configured to fail");
        }
        Ok(())
    }

    async fn on_restart(&self, task_id: &str, detail: &TaskDetail) -> anyhow::Result<()> {
        self.push(ObservedEvent::Restart {
            task_id: task_id.to_string(),
            name: detail.name().to_string(),
        });
        if self.fail_callbacks {
            anyhow::bail!("observer configured to fail");
        }
        Ok(())
    }
}
