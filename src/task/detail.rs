// src/task/detail.rs

//! Immutable task definitions and completion payloads.

use crate::errors::{Result, SupervisorError};

/// How the supervisor treats a task once its child process exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    /// Run once; the task is removed from the registry on completion.
    OneShot,
    /// Run indefinitely; the child is restarted on completion.
    Repeater,
}

/// Immutable definition of a supervised task.
///
/// Created by the boundary and never mutated; the registry hands it out
/// through the immutable task surface, so reading it requires no lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetail {
    name: String,
    command: String,
    directory: String,
    task_type: TaskType,
}

impl TaskDetail {
    /// Build a task detail, rejecting blank fields.
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        directory: impl Into<String>,
        task_type: TaskType,
    ) -> Result<Self> {
        let name = name.into();
        let command = command.into();
        let directory = directory.into();

        if name.trim().is_empty() {
            return Err(SupervisorError::ConfigError(
                "task name must not be blank".to_string(),
            ));
        }
        if command.trim().is_empty() {
            return Err(SupervisorError::ConfigError(format!(
                "task '{name}' has a blank command"
            )));
        }
        if directory.trim().is_empty() {
            return Err(SupervisorError::ConfigError(format!(
                "task '{name}' has a blank working directory"
            )));
        }

        Ok(Self {
            name,
            command,
            directory,
            task_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }
}

/// Exit status of one finished child process, as delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub exit_code: i32,
    pub exit_message: String,
}
