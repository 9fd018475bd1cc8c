// src/registry/entry.rs

//! Per-key entry handle passed to `run_under_key` actions.

use std::sync::Arc;

use crate::registry::Entries;
use crate::registry::view::TaskView;
use crate::task::TaskProcess;

/// Handle on one registry key, valid for the duration of a `run_under_key`
/// action. The caller holds the key's exclusive lock, which is what makes
/// `replace`/`remove` and the mutable task surface safe.
pub struct MapEntry {
    key: String,
    entries: Entries,
}

impl MapEntry {
    pub(crate) fn new(key: String, entries: Entries) -> Self {
        Self { key, entries }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_present(&self) -> bool {
        self.entries.read().contains_key(&self.key)
    }

    /// Immutable surface of the entry, if present.
    pub fn immutable(&self) -> Option<TaskView> {
        self.entries
            .read()
            .get(&self.key)
            .cloned()
            .map(TaskView::new)
    }

    /// Mutable surface of the entry, if present. Safe because the caller
    /// holds the per-key lock.
    pub fn mutable(&self) -> Option<Arc<TaskProcess>> {
        self.entries.read().get(&self.key).cloned()
    }

    /// Insert or overwrite the entry for this key.
    pub fn replace(&self, process: Arc<TaskProcess>) {
        self.entries.write().insert(self.key.clone(), process);
    }

    /// Remove the entry for this key, returning it if it was present.
    pub fn remove(&self) -> Option<Arc<TaskProcess>> {
        self.entries.write().remove(&self.key)
    }
}
