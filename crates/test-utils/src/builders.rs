#![allow(dead_code)]

use procherd::task::{TaskDetail, TaskType};

/// Builder for `TaskDetail` to simplify test setup.
pub struct TaskDetailBuilder {
    name: String,
    command: String,
    directory: String,
    task_type: TaskType,
}

impl TaskDetailBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            name: "test-task".to_string(),
            command: command.to_string(),
            directory: ".".to_string(),
            task_type: TaskType::Repeater,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn directory(mut self, directory: &str) -> Self {
        self.directory = directory.to_string();
        self
    }

    pub fn one_shot(mut self) -> Self {
        self.task_type = TaskType::OneShot;
        self
    }

    pub fn repeater(mut self) -> Self {
        self.task_type = TaskType::Repeater;
        self
    }

    pub fn build(self) -> TaskDetail {
        TaskDetail::new(self.name, self.command, self.directory, self.task_type)
            .expect("failed to build valid task detail from builder")
    }
}
