//! # Task abstraction.
//!
//! A [`Task`] is consumed by exactly one execution: [`Task::spawn`] takes the boxed
//! task by value and turns it into a future. The common handle type is [`TaskRef`],
//! a `Box<dyn Task>` that moves from the submitter to the coordinator and then to
//! one key worker.

use std::{future::Future, pin::Pin};

use crate::error::TaskError;

/// Boxed future returned by [`Task::spawn`].
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// Owned, type-erased task.
pub type TaskRef = Box<dyn Task>;

/// # One-shot unit of work.
///
/// The body is opaque to the scheduler. Returning `Err` (or panicking) is reported
/// through events and never prevents the next task for the same key from running.
///
/// # Example
/// ```
/// use stickyvisor::{BoxTaskFuture, Task};
///
/// struct Flush {
///     partition: u32,
/// }
///
/// impl Task for Flush {
///     fn spawn(self: Box<Self>) -> BoxTaskFuture {
///         Box::pin(async move {
///             let _ = self.partition; // flush partition...
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Task: Send + 'static {
    /// Converts the task into the future that executes it.
    fn spawn(self: Box<Self>) -> BoxTaskFuture;
}
