// src/config/mod.rs

//! Task-list document handling: XML model, loading, validation.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{EntryType, ProcessEntry, ProcessList, RawProcessList};
