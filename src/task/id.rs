// src/task/id.rs

//! Task id generation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Issues opaque, monotonically increasing task ids.
///
/// Ids are unique within one supervisor lifetime; they are not persisted.
#[derive(Debug, Default)]
pub struct TaskIdGenerator {
    next: AtomicU64,
}

impl TaskIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("task-{n}")
    }
}
