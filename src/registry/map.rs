// src/registry/map.rs

//! Keyed registry of supervised tasks with budgeted per-key locking.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex as LockTable, RwLock};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::{Instant, timeout_at};

use crate::registry::Entries;
use crate::registry::entry::MapEntry;
use crate::registry::view::MapView;
use crate::task::TaskProcess;

/// The time budget ran out before the per-key lock could be acquired.
#[derive(Error, Debug)]
#[error("time budget exhausted while locking task '{task_id}'")]
pub struct LockBudgetExceeded {
    pub task_id: String,
}

type KeyLock = Arc<Mutex<()>>;

/// Concurrent map of task id → [`TaskProcess`].
///
/// Mutations to an entry (and to the mutable surface of its task process)
/// happen only inside [`run_under_key`](Self::run_under_key), which holds an
/// exclusive lock for that key. The lock table itself is guarded by a single
/// synchronous coordination mutex that is only ever held across the
/// lookup-or-create and garbage-collect steps, never across an await.
pub struct TaskProcessMap {
    entries: Entries,
    locks: LockTable<HashMap<String, KeyLock>>,
}

impl Default for TaskProcessMap {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskProcessMap {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            locks: LockTable::new(HashMap::new()),
        }
    }

    /// Read-only concurrent view of the map.
    pub fn view(&self) -> MapView {
        MapView::new(Arc::clone(&self.entries))
    }

    /// Execute `action` while holding the exclusive lock for `task_id`.
    ///
    /// The whole call observes `budget`: lock acquisition that would overrun
    /// it fails with [`LockBudgetExceeded`], and the action receives the time
    /// remaining after acquisition (zero remaining is its signal to fail
    /// fast). Calls for distinct keys only contend on the brief coordination
    /// section; calls for the same key serialize in lock-acquisition order.
    pub async fn run_under_key<R, F, Fut>(
        &self,
        task_id: &str,
        budget: Duration,
        action: F,
    ) -> Result<R, LockBudgetExceeded>
    where
        F: FnOnce(MapView, MapEntry, Duration) -> Fut,
        Fut: Future<Output = R>,
    {
        let deadline = Instant::now() + budget;

        // Collects the lock on every exit path, including the call being
        // dropped at one of the awaits below, so a cancelled operation cannot
        // strand its key in the table.
        let _cleanup = LockTableCleanup { map: self, task_id };

        // Look up or create the per-key lock under the coordination lock.
        let key_lock = Arc::clone(self.locks.lock().entry(task_id.to_string()).or_default());

        // Acquire the per-key lock with whatever budget is left. The owned
        // guard consumes our Arc clone, so after it drops only the table and
        // genuine waiters still hold the lock.
        let guard = match timeout_at(deadline, key_lock.lock_owned()).await {
            Ok(guard) => guard,
            Err(_) => {
                return Err(LockBudgetExceeded {
                    task_id: task_id.to_string(),
                });
            }
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        let entry = MapEntry::new(task_id.to_string(), Arc::clone(&self.entries));
        let result = action(self.view(), entry, remaining).await;

        drop(guard);
        Ok(result)
    }

    /// Drop the per-key lock iff nobody holds or awaits it and the key has no
    /// entry. Checking the Arc count covers waiters that already cloned the
    /// lock out of the table but have not acquired it yet.
    fn collect_unused_lock(&self, task_id: &str) {
        let mut table = self.locks.lock();
        let unused = table.get(task_id).is_some_and(|lock| {
            Arc::strong_count(lock) == 1 && lock.try_lock().is_ok()
        }) && !self.entries.read().contains_key(task_id);
        if unused {
            table.remove(task_id);
        }
    }

    #[cfg(test)]
    fn lock_table_len(&self) -> usize {
        self.locks.lock().len()
    }
}

/// Scope guard over one `run_under_key` call. Declared before the per-key
/// guard, so on any unwind the key lock is released first and the table is
/// collected second.
struct LockTableCleanup<'a> {
    map: &'a TaskProcessMap,
    task_id: &'a str,
}

impl Drop for LockTableCleanup<'_> {
    fn drop(&mut self) {
        self.map.collect_unused_lock(self.task_id);
    }
}
