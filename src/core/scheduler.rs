//! # Scheduler: public facade over the coordinator.
//!
//! The [`Scheduler`] owns the coordinator task, the optional subscriber listener and
//! the shutdown token. Producers talk to the coordinator only through the bounded
//! intake channel, either via the scheduler itself or a cloned [`SchedulerHandle`].
//!
//! ## Shutdown path
//! ```text
//! Scheduler::shutdown()
//!   └─► shutdown_token.cancel()
//!         └─► coordinator: intake.close()        (Accepting → Draining)
//!               ├─ buffered submissions still dispatched/queued
//!               ├─ completions keep feeding queued successors
//!               └─ running == 0 → join workers → DrainCompleted → exit
//!   └─► await coordinator join handle           (Terminated)
//!   └─► await subscriber listener (all events delivered)
//! ```
//!
//! ## Misuse policy
//! - `submit` after `shutdown` started → [`SubmitError::Closed`], the task never runs.
//! - second `shutdown` → [`RuntimeError::AlreadyShutdown`]; the first call still owns the drain.
//! - dropping the scheduler and every handle without `shutdown` closes the intake;
//!   the coordinator drains in the background and exits.
//!
//! ## Example
//! ```rust
//! use stickyvisor::{Scheduler, TaskError, TaskFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sched = Scheduler::with_limit(4);
//!
//!     for order in 0..3 {
//!         sched
//!             .submit("account-1", TaskFn::new(move || async move {
//!                 println!("account-1 event {order}");
//!                 Ok::<_, TaskError>(())
//!             }))
//!             .await?;
//!     }
//!
//!     sched.shutdown().await?;
//!     assert!(sched.stats().is_idle());
//!     Ok(())
//! }
//! ```

use std::sync::{Mutex, PoisonError};

use tokio::{
    sync::{
        broadcast::error::{RecvError, TryRecvError},
        mpsc, watch,
    },
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{builder::SchedulerBuilder, config::Config, stats::Stats},
    error::{RuntimeError, SubmitError, TaskError},
    events::{Bus, Event},
    subscribers::SubscriberSet,
    tasks::{Key, Submission, Task},
};

/// Cloneable producer handle.
///
/// Submissions from one handle reach the coordinator in call order; submissions
/// racing from several handles are interleaved in whatever order they arrive.
pub struct SchedulerHandle<K> {
    tx: mpsc::Sender<Submission<K>>,
    shutdown: CancellationToken,
}

impl<K> Clone for SchedulerHandle<K> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<K: Key> SchedulerHandle<K> {
    /// Submits `task` under `key` (async, waits if the intake is full).
    pub async fn submit(&self, key: K, task: impl Task) -> Result<(), SubmitError> {
        self.send(Submission::new(key, task)).await
    }

    /// Sends a prepared [`Submission`].
    pub async fn send(&self, sub: Submission<K>) -> Result<(), SubmitError> {
        if self.shutdown.is_cancelled() {
            return Err(SubmitError::Closed);
        }
        self.tx.send(sub).await.map_err(|_| SubmitError::Closed)
    }

    /// Try to submit without waiting (fails if the intake is full).
    pub fn try_submit(&self, key: K, task: impl Task) -> Result<(), SubmitError> {
        if self.shutdown.is_cancelled() {
            return Err(SubmitError::Closed);
        }
        self.tx
            .try_send(Submission::new(key, task))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => SubmitError::Full,
                mpsc::error::TrySendError::Closed(_) => SubmitError::Closed,
            })
    }

    /// Submits from synchronous code, blocking the current thread on backpressure.
    ///
    /// # Panics
    /// Panics if called from within an asynchronous execution context
    /// (same contract as [`mpsc::Sender::blocking_send`]).
    pub fn blocking_submit(&self, key: K, task: impl Task) -> Result<(), SubmitError> {
        if self.shutdown.is_cancelled() {
            return Err(SubmitError::Closed);
        }
        self.tx
            .blocking_send(Submission::new(key, task))
            .map_err(|_| SubmitError::Closed)
    }

    /// True once the intake no longer accepts submissions.
    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled() || self.tx.is_closed()
    }
}

/// Background tasks owned by a running scheduler.
struct Runtime {
    coordinator: JoinHandle<()>,
    listener: Option<JoinHandle<()>>,
    finished: CancellationToken,
}

/// Key-sticky task scheduler.
///
/// Tasks sharing a key run one at a time in submission order; tasks with different
/// keys run in parallel, at most `max_concurrent` at once when a limit is set.
pub struct Scheduler<K: Key> {
    handle: SchedulerHandle<K>,
    shutdown: CancellationToken,
    stats: watch::Receiver<Stats>,
    runtime: Mutex<Option<Runtime>>,
}

impl<K: Key> Scheduler<K> {
    /// Creates a scheduler and starts its coordinator.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(cfg: Config) -> Self {
        Self::builder(cfg).build()
    }

    /// Creates a scheduler capped at `max_concurrency` running tasks (`<= 0` = unlimited).
    pub fn with_limit(max_concurrency: isize) -> Self {
        Self::new(Config::with_limit(max_concurrency))
    }

    /// Returns a builder for attaching subscribers.
    pub fn builder(cfg: Config) -> SchedulerBuilder<K> {
        SchedulerBuilder::new(cfg)
    }

    pub(super) fn new_internal(
        tx: mpsc::Sender<Submission<K>>,
        shutdown: CancellationToken,
        stats: watch::Receiver<Stats>,
        coordinator: JoinHandle<()>,
        listener: Option<JoinHandle<()>>,
        finished: CancellationToken,
    ) -> Self {
        Self {
            handle: SchedulerHandle {
                tx,
                shutdown: shutdown.clone(),
            },
            shutdown,
            stats,
            runtime: Mutex::new(Some(Runtime {
                coordinator,
                listener,
                finished,
            })),
        }
    }

    /// Forwards bus events to the subscriber set until the coordinator has finished
    /// and every buffered event was delivered.
    ///
    /// Events skipped because the listener lagged are reported to subscribers as one
    /// `SubscriberOverflow`. Events published by subscriber workers while they flush
    /// on shutdown are not delivered.
    pub(super) fn subscriber_listener(
        bus: &Bus,
        set: SubscriberSet,
        finished: CancellationToken,
    ) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    msg = rx.recv() => match msg {
                        Ok(ev) => set.emit(&ev),
                        Err(RecvError::Lagged(skipped)) => set.emit(&Event::listener_lagged(skipped)),
                        Err(RecvError::Closed) => break,
                    },
                    _ = finished.cancelled() => break,
                }
            }
            loop {
                match rx.try_recv() {
                    Ok(ev) => set.emit(&ev),
                    Err(TryRecvError::Lagged(skipped)) => set.emit(&Event::listener_lagged(skipped)),
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        })
    }

    /// Returns a cloneable handle for producers.
    pub fn handle(&self) -> SchedulerHandle<K> {
        self.handle.clone()
    }

    /// Submits `task` under `key` (async, waits if the intake is full).
    pub async fn submit(&self, key: K, task: impl Task) -> Result<(), SubmitError> {
        self.handle.submit(key, task).await
    }

    /// Try to submit without waiting (fails if the intake is full).
    pub fn try_submit(&self, key: K, task: impl Task) -> Result<(), SubmitError> {
        self.handle.try_submit(key, task)
    }

    /// Submits from synchronous code; see [`SchedulerHandle::blocking_submit`].
    pub fn blocking_submit(&self, key: K, task: impl Task) -> Result<(), SubmitError> {
        self.handle.blocking_submit(key, task)
    }

    /// Latest coordinator snapshot.
    pub fn stats(&self) -> Stats {
        *self.stats.borrow()
    }

    /// Receiver notified on every snapshot change.
    pub fn watch_stats(&self) -> watch::Receiver<Stats> {
        self.stats.clone()
    }

    /// True once `shutdown` has been called.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Stops accepting submissions and waits until every accepted one has run.
    ///
    /// Returns after all key workers were joined and every event was delivered to
    /// subscribers. There is no timeout: a task that never finishes keeps this
    /// future pending.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let runtime = self
            .runtime
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(runtime) = runtime else {
            return Err(RuntimeError::AlreadyShutdown);
        };

        self.shutdown.cancel();
        let res = runtime.coordinator.await.map_err(|je| {
            let reason = if je.is_panic() {
                TaskError::from_panic(je.into_panic()).as_message()
            } else {
                "aborted".to_string()
            };
            RuntimeError::CoordinatorDead { reason }
        });

        runtime.finished.cancel();
        if let Some(listener) = runtime.listener {
            let _ = listener.await;
        }
        res
    }
}
