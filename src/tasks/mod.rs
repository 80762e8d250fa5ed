//! # Task abstractions and submissions.
//!
//! This module provides the task-related types:
//! - [`Key`] - bound for affinity keys (equality + hashing + `Debug` for events)
//! - [`Task`] - trait for one-shot units of work
//! - [`TaskFn`] / [`BlockingFn`] - closure-backed task implementations
//! - [`TaskRef`] - owned, type-erased task (`Box<dyn Task>`)
//! - [`Submission`] - immutable `(key, task)` pair crossing the scheduler boundary

mod key;
mod submission;
mod task;
mod task_fn;

pub use key::Key;
pub use submission::Submission;
pub use task::{BoxTaskFuture, Task, TaskRef};
pub use task_fn::{BlockingFn, TaskFn};
