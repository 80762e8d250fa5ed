//! # Run a single task and report its outcome.
//!
//! Executes one [`Task`](crate::Task) to completion on the calling key worker and
//! publishes exactly one terminal event to the [`Bus`].
//!
//! ## Event flow
//! ```text
//! Success:  task.spawn() → Ok(())        → publish TaskCompleted
//! Failure:  task.spawn() → Err(Fail/..)  → publish TaskFailed
//! Panic:    task.spawn() ─► unwinds      → catch_unwind → publish TaskPanicked
//! ```
//!
//! ## Rules
//! - Always returns; a panicking task body is converted into `TaskError::Panicked`
//!   so the worker can report completion and keep serving its key.
//! - No timeout and no preemption: the task runs until it finishes.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::{
    error::TaskError,
    events::{Bus, Event, EventKind},
    tasks::TaskRef,
};

/// Executes `task`, publishing its terminal event under `key`.
pub(super) async fn run_once(task: TaskRef, key: &Arc<str>, bus: &Bus) -> Result<(), TaskError> {
    // spawn() itself may panic before yielding a future
    let res = AssertUnwindSafe(async move { task.spawn().await })
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(TaskError::from_panic(panic)));

    match &res {
        Ok(()) => publish_completed(bus, key),
        Err(e @ TaskError::Panicked { .. }) => publish_outcome(bus, EventKind::TaskPanicked, key, e),
        Err(e) => publish_outcome(bus, EventKind::TaskFailed, key, e),
    }
    res
}

/// Publishes `TaskCompleted`.
fn publish_completed(bus: &Bus, key: &Arc<str>) {
    bus.publish(Event::new(EventKind::TaskCompleted).with_key(Arc::clone(key)));
}

/// Publishes `TaskFailed` / `TaskPanicked` with error details.
fn publish_outcome(bus: &Bus, kind: EventKind, key: &Arc<str>, err: &TaskError) {
    bus.publish(
        Event::new(kind)
            .with_key(Arc::clone(key))
            .with_reason(err.to_string()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskFn;

    #[tokio::test]
    async fn test_panic_is_contained_and_reported() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let key: Arc<str> = "\"a\"".into();

        let task: TaskRef = Box::new(TaskFn::new(|| async {
            if true {
                panic!("kaboom");
            }
            Ok::<_, TaskError>(())
        }));
        let res = run_once(task, &key, &bus).await;

        assert_eq!(res, Err(TaskError::Panicked { info: "kaboom".into() }));
        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::TaskPanicked);
        assert_eq!(ev.key.as_deref(), Some("\"a\""));
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let key: Arc<str> = "1".into();

        let task: TaskRef = Box::new(TaskFn::new(|| async { Err::<(), _>(TaskError::fail("nope")) }));
        let res = run_once(task, &key, &bus).await;

        assert_eq!(res, Err(TaskError::fail("nope")));
        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::TaskFailed);
        assert_eq!(ev.reason.as_deref(), Some("execution failed: nope"));
    }
}
