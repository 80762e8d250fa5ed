//! Error types used by the stickyvisor runtime and tasks.
//!
//! This module defines three error enums:
//!
//! - [`RuntimeError`]: errors raised by the scheduler runtime itself.
//! - [`SubmitError`]: a submission was not accepted by the coordinator.
//! - [`TaskError`]: errors raised by individual task executions.
//!
//! Runtime and task errors provide helper methods (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

/// # Errors produced by the stickyvisor runtime.
///
/// These represent failures of the scheduler itself, never of user tasks.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// `shutdown` was already called on this scheduler; the first call owns the drain.
    #[error("shutdown already requested")]
    AlreadyShutdown,

    /// Coordinator task terminated abnormally (panic or abort), scheduling state is lost.
    #[error("coordinator terminated abnormally: {reason}")]
    CoordinatorDead {
        /// Panic message or abort reason.
        reason: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use stickyvisor::RuntimeError;
    ///
    /// assert_eq!(RuntimeError::AlreadyShutdown.as_label(), "runtime_already_shutdown");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::AlreadyShutdown => "runtime_already_shutdown",
            RuntimeError::CoordinatorDead { .. } => "runtime_coordinator_dead",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::AlreadyShutdown => "shutdown called more than once".to_string(),
            RuntimeError::CoordinatorDead { reason } => format!("coordinator dead: {reason}"),
        }
    }
}

/// Error returned by the `submit` family on [`Scheduler`](crate::Scheduler)
/// and [`SchedulerHandle`](crate::SchedulerHandle).
///
/// The rejected submission is dropped; its task never runs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// Intake queue is full (try again later or use async `submit`).
    #[error("submission queue full")]
    Full,

    /// Intake is closed: shutdown was requested or the coordinator is gone.
    #[error("scheduler intake closed")]
    Closed,
}

/// # Errors produced by task execution.
///
/// A task reports one of these to its key worker; the worker publishes it as an event
/// and moves on to the next task for the same key.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task panicked; the panic was caught by its key worker.
    #[error("task panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },

    /// Task gave up on its own (e.g. a cancellation convention inside the task body).
    #[error("task cancelled")]
    Canceled,
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use stickyvisor::TaskError;
    ///
    /// let err = TaskError::fail("boom");
    /// assert_eq!(err.as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
            TaskError::Canceled => "task cancelled".to_string(),
        }
    }

    /// Renders a caught panic payload (`&'static str` or `String`) as text.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let info = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        TaskError::Panicked { info }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(TaskError::fail("x").as_label(), "task_failed");
        assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
        assert_eq!(
            RuntimeError::CoordinatorDead {
                reason: "boom".into()
            }
            .as_label(),
            "runtime_coordinator_dead"
        );
    }

    #[test]
    fn test_panic_payload_rendering() {
        let err = TaskError::from_panic(Box::new("static message"));
        assert_eq!(
            err,
            TaskError::Panicked {
                info: "static message".into()
            }
        );

        let err = TaskError::from_panic(Box::new(String::from("owned message")));
        assert_eq!(err.as_message(), "panic: owned message");

        let err = TaskError::from_panic(Box::new(42_u32));
        assert_eq!(err.as_message(), "panic: unknown panic");
    }
}
