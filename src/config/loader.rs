// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ProcessList, RawProcessList};
use crate::errors::Result;

/// Load a task-list document and return the raw `RawProcessList`.
///
/// This only performs XML deserialization; it does **not** perform semantic
/// validation (blank fields, etc.). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawProcessList> {
    let contents = fs::read_to_string(path.as_ref())?;
    let list: RawProcessList = quick_xml::de::from_str(&contents)?;
    Ok(list)
}

/// Load a task-list document and reject it if any required field is blank.
///
/// This is the entry point the boundary uses: a document that fails here
/// terminates the program before any task is submitted.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProcessList> {
    let raw = load_from_path(path)?;
    let list = ProcessList::try_from(raw)?;
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::EntryType;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_the_documented_example() {
        let file = write_temp(
            r#"<processes>
                 <process name="proc1">
                   <workdir>/home/user/proc1</workdir>
                   <command>greeter.sh -c 1</command>
                 </process>
               </processes>"#,
        );
        let list = load_and_validate(file.path()).unwrap();
        assert_eq!(list.processes().len(), 1);
        let entry = &list.processes()[0];
        assert_eq!(entry.name, "proc1");
        assert_eq!(entry.workdir, "/home/user/proc1");
        assert_eq!(entry.command, "greeter.sh -c 1");
        assert_eq!(entry.task_type, EntryType::Repeater);
    }

    #[test]
    fn parses_an_explicit_one_shot_type() {
        let file = write_temp(
            r#"<processes>
                 <process name="once" type="one-shot">
                   <workdir>.</workdir>
                   <command>true</command>
                 </process>
               </processes>"#,
        );
        let list = load_and_validate(file.path()).unwrap();
        assert_eq!(list.processes()[0].task_type, EntryType::OneShot);
    }

    #[test]
    fn rejects_a_blank_command_element() {
        let file = write_temp(
            r#"<processes>
                 <process name="bad">
                   <workdir>.</workdir>
                   <command>  </command>
                 </process>
               </processes>"#,
        );
        assert!(load_and_validate(file.path()).is_err());
    }

    #[test]
    fn rejects_a_missing_required_element() {
        let file = write_temp(
            r#"<processes>
                 <process name="bad">
                   <workdir>.</workdir>
                 </process>
               </processes>"#,
        );
        assert!(load_and_validate(file.path()).is_err());
    }

    #[test]
    fn rejects_malformed_xml() {
        let file = write_temp("<processes><process></processes>");
        assert!(load_from_path(file.path()).is_err());
    }

    #[test]
    fn accepts_an_empty_process_list() {
        let file = write_temp("<processes></processes>");
        let list = load_and_validate(file.path()).unwrap();
        assert!(list.is_empty());
    }
}
