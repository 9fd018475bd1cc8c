// src/task/mod.rs

//! Task model: immutable definitions, id generation, and the per-task
//! process wrapper.

pub mod detail;
pub mod id;
pub mod process;

pub use detail::{TaskDetail, TaskResult, TaskType};
pub use id::TaskIdGenerator;
pub use process::TaskProcess;
