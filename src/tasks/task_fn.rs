//! # Closure-backed tasks
//!
//! - [`TaskFn`] wraps `F: FnOnce() -> Fut`, an async body run on the key worker itself.
//! - [`BlockingFn`] wraps a synchronous `F: FnOnce()`; it runs on tokio's blocking pool
//!   while the key worker awaits it, so CPU-heavy or blocking bodies do not stall the
//!   async runtime.
//!
//! ## Example
//! ```rust
//! use stickyvisor::{BlockingFn, TaskError, TaskFn};
//!
//! let fetch = TaskFn::new(|| async move {
//!     // await I/O...
//!     Ok::<_, TaskError>(())
//! });
//!
//! let crunch = BlockingFn::new(|| {
//!     let _sum: u64 = (0..1_000).sum();
//! });
//! # let _ = (fetch, crunch);
//! ```

use std::future::Future;

use crate::error::TaskError;
use crate::tasks::task::{BoxTaskFuture, Task};

/// Async closure-backed task.
#[derive(Debug)]
pub struct TaskFn<F> {
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new closure-backed task.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, Fut> Task for TaskFn<F>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn spawn(self: Box<Self>) -> BoxTaskFuture {
        Box::pin((self.f)())
    }
}

/// Synchronous closure-backed task, executed via [`tokio::task::spawn_blocking`].
#[derive(Debug)]
pub struct BlockingFn<F> {
    f: F,
}

impl<F> BlockingFn<F> {
    /// Creates a new blocking task.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Task for BlockingFn<F>
where
    F: FnOnce() + Send + 'static,
{
    fn spawn(self: Box<Self>) -> BoxTaskFuture {
        let f = self.f;
        Box::pin(async move {
            match tokio::task::spawn_blocking(f).await {
                Ok(()) => Ok(()),
                Err(je) if je.is_panic() => Err(TaskError::from_panic(je.into_panic())),
                Err(_) => Err(TaskError::Canceled),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_task_fn_runs_once() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let task: Box<dyn Task> = Box::new(TaskFn::new(move || async move {
            flag.store(true, Ordering::SeqCst);
            Ok::<_, TaskError>(())
        }));

        assert_eq!(task.spawn().await, Ok(()));
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_blocking_panic_becomes_error() {
        let task: Box<dyn Task> = Box::new(BlockingFn::new(|| {
            if true {
                panic!("sync boom");
            }
        }));
        let err = task.spawn().await.expect_err("panic must surface");
        assert_eq!(
            err,
            TaskError::Panicked {
                info: "sync boom".into()
            }
        );
    }
}
