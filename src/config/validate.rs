// src/config/validate.rs

use crate::config::model::{ProcessList, RawProcessList};
use crate::errors::{Result, SupervisorError};

impl TryFrom<RawProcessList> for ProcessList {
    type Error = SupervisorError;

    fn try_from(raw: RawProcessList) -> std::result::Result<Self, Self::Error> {
        validate_raw_list(&raw)?;
        Ok(ProcessList::new_unchecked(raw.processes))
    }
}

fn validate_raw_list(raw: &RawProcessList) -> Result<()> {
    for (index, entry) in raw.processes.iter().enumerate() {
        if entry.name.trim().is_empty() {
            return Err(SupervisorError::ConfigError(format!(
                "process #{} has a blank `name` attribute",
                index + 1
            )));
        }
        if entry.workdir.trim().is_empty() {
            return Err(SupervisorError::ConfigError(format!(
                "process '{}' has a blank <workdir> element",
                entry.name
            )));
        }
        if entry.command.trim().is_empty() {
            return Err(SupervisorError::ConfigError(format!(
                "process '{}' has a blank <command> element",
                entry.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{EntryType, ProcessEntry};

    fn entry(name: &str, workdir: &str, command: &str) -> ProcessEntry {
        ProcessEntry {
            name: name.to_string(),
            task_type: EntryType::default(),
            workdir: workdir.to_string(),
            command: command.to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_entries() {
        let raw = RawProcessList {
            processes: vec![entry("a", "/tmp", "sleep 1")],
        };
        let list = ProcessList::try_from(raw).unwrap();
        assert_eq!(list.processes().len(), 1);
    }

    #[test]
    fn rejects_blank_command() {
        let raw = RawProcessList {
            processes: vec![entry("a", "/tmp", "   ")],
        };
        let err = ProcessList::try_from(raw).unwrap_err();
        assert!(err.to_string().contains("blank <command>"));
    }

    #[test]
    fn rejects_blank_name_and_workdir() {
        let raw = RawProcessList {
            processes: vec![entry("", "/tmp", "x")],
        };
        assert!(ProcessList::try_from(raw).is_err());

        let raw = RawProcessList {
            processes: vec![entry("a", "", "x")],
        };
        assert!(ProcessList::try_from(raw).is_err());
    }

    #[test]
    fn empty_document_is_valid() {
        let list = ProcessList::try_from(RawProcessList::default()).unwrap();
        assert!(list.is_empty());
    }
}
