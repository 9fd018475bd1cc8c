// src/registry/mod.rs

//! Supervised-task registry.
//!
//! - [`map`] owns the keyed entry map, the per-key lock table, and the
//!   budgeted `run_under_key` operator.
//! - [`entry`] is the per-key handle actions mutate through.
//! - [`view`] holds the read-only surfaces (`MapView`, `TaskView`).
//!
//! Capability split: anything reachable from a [`MapView`] is safe without a
//! lock; the mutable task surface is only reachable through a [`MapEntry`],
//! which exists solely inside `run_under_key` actions.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::task::TaskProcess;

pub(crate) type Entries = Arc<RwLock<HashMap<String, Arc<TaskProcess>>>>;

pub mod entry;
pub mod map;
pub mod view;

pub use entry::MapEntry;
pub use map::{LockBudgetExceeded, TaskProcessMap};
pub use view::{MapView, TaskView};
