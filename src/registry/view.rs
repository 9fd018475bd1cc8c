// src/registry/view.rs

//! Read-only views over the registry.

use std::sync::Arc;

use crate::registry::Entries;
use crate::task::{TaskDetail, TaskProcess};

/// Immutable surface of one registered task.
///
/// Holding a `TaskView` grants access to the task definition and nothing
/// else; the mutable surface is only reachable through a `MapEntry`, i.e.
/// while holding the task's per-key lock.
#[derive(Clone)]
pub struct TaskView {
    process: Arc<TaskProcess>,
}

impl TaskView {
    pub(crate) fn new(process: Arc<TaskProcess>) -> Self {
        Self { process }
    }

    pub fn detail(&self) -> &TaskDetail {
        self.process.detail()
    }
}

/// Concurrent read-only view of the registry: task id → immutable surface.
///
/// Reads reflect additions and removals as they happen; there is no
/// atomicity guarantee across keys.
#[derive(Clone)]
pub struct MapView {
    entries: Entries,
}

impl MapView {
    pub(crate) fn new(entries: Entries) -> Self {
        Self { entries }
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.entries.read().contains_key(task_id)
    }

    pub fn get(&self, task_id: &str) -> Option<TaskView> {
        self.entries.read().get(task_id).cloned().map(TaskView::new)
    }

    /// Snapshot of the currently registered task ids.
    pub fn task_ids(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
