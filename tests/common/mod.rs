#![allow(dead_code)]

pub use procherd_test_utils::{
    fast_manager_options, init_tracing, with_timeout, ObservedEvent, RecordingObserver,
    TaskDetailBuilder,
};

use std::path::PathBuf;

use tempfile::TempDir;

/// Write a task-list XML file into a fresh temp directory and return both,
/// keeping the directory alive for the test's duration.
pub fn task_list_file(xml: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("tasks.xml");
    std::fs::write(&path, xml).expect("write task list");
    (dir, path)
}
