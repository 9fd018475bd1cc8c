// src/config/model.rs

//! Data model of the XML task-list document.
//!
//! ```text
//! <processes>
//!   <process name="proc1" type="repeater">
//!     <workdir>/home/user/proc1</workdir>
//!     <command>greeter.sh -c 1</command>
//!   </process>
//! </processes>
//! ```
//!
//! The `type` attribute is optional and defaults to `repeater`.

use serde::Deserialize;

use crate::errors::Result;
use crate::task::{TaskDetail, TaskType};

/// Task type as written in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryType {
    OneShot,
    #[default]
    Repeater,
}

impl From<EntryType> for TaskType {
    fn from(value: EntryType) -> Self {
        match value {
            EntryType::OneShot => TaskType::OneShot,
            EntryType::Repeater => TaskType::Repeater,
        }
    }
}

/// One `<process>` element.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessEntry {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@type", default)]
    pub task_type: EntryType,
    pub workdir: String,
    pub command: String,
}

impl ProcessEntry {
    pub fn to_task_detail(&self) -> Result<TaskDetail> {
        TaskDetail::new(
            self.name.clone(),
            self.command.clone(),
            self.workdir.clone(),
            self.task_type.into(),
        )
    }
}

/// The `<processes>` root as deserialized, prior to semantic validation.
#[derive(Debug, Default, Deserialize)]
pub struct RawProcessList {
    #[serde(rename = "process", default)]
    pub processes: Vec<ProcessEntry>,
}

/// A validated task-list document. Construct via
/// `ProcessList::try_from(RawProcessList)`.
#[derive(Debug)]
pub struct ProcessList {
    processes: Vec<ProcessEntry>,
}

impl ProcessList {
    pub(crate) fn new_unchecked(processes: Vec<ProcessEntry>) -> Self {
        Self { processes }
    }

    pub fn processes(&self) -> &[ProcessEntry] {
        &self.processes
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}
