// src/exec/mod.rs

//! External-process adapter.
//!
//! This layer is the only part of the crate that touches the OS process API.
//!
//! - [`subst`] rewrites `${name}` variables in commands and directories.
//! - [`spawn`] validates and starts child processes.
//! - [`process`] is the handle over one spawn: liveness queries, destroy with
//!   graceful/forceful escalation, bounded waits, and the published exit
//!   outcome.

pub mod process;
pub mod spawn;
pub mod subst;

pub use process::{ExitOutcome, ExternalProcess};
pub use spawn::{ProcessSpawner, SpawnError};
