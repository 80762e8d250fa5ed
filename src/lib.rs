//! # stickyvisor
//!
//! **Stickyvisor** is a key-sticky task scheduler for tokio.
//!
//! Every task is submitted under an affinity key. Tasks sharing a key run strictly
//! one at a time, in the order they were accepted; tasks with different keys run in
//! parallel, optionally capped by a global limit on simultaneously running tasks.
//! Typical use: per-entity event processing where each entity's events must stay
//! ordered while different entities proceed independently.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     submit("a", t1)     submit("b", t2)     submit("a", t3)
//!            │                   │                   │
//!            ▼                   ▼                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  intake (bounded mpsc, backpressure)                              │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Coordinator (single owner, one event at a time)                  │
//! │  - SlotTable: key → { worker channel, pending queue }             │
//! │  - Admission: running count vs max_concurrent                     │
//! │  - Stats: watch snapshot after every event                        │
//! └──────┬──────────────────────────────────────┬─────────────────────┘
//!        ▼ t1 (t3 queued)                       ▼ t2
//!     ┌──────────────┐                       ┌──────────────┐
//!     │ KeyWorker "a"│                       │ KeyWorker "b"│
//!     │ (sequential) │                       │ (sequential) │
//!     └──────┬───────┘                       └──────┬───────┘
//!            └──────── Completion{key} ─────────────┘──► Coordinator
//!
//! Every transition is published on the Bus ──► SubscriberSet ──► Subscribe impls
//! ```
//!
//! ### Lifecycle
//! ```text
//! submit(k, t):
//!   ├─ running == max_concurrent → coordinator waits for one completion first
//!   ├─ no worker for k           → spawn KeyWorker(k), hand t over, running += 1
//!   └─ worker for k busy         → queue[k].push_back(t)
//!
//! completion(k):
//!   ├─ running -= 1
//!   ├─ queue[k] non-empty → hand front to the same worker, running += 1
//!   └─ queue[k] empty     → retire worker (it exits, coordinator joins it)
//!
//! shutdown():
//!   Accepting ──► Draining (intake closed, queued/running work continues)
//!             ──► Terminated (running == 0, no workers) ──► shutdown() returns
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Scheduling**    | Per-key ordering, cross-key parallelism, global cap, drain.   | [`Scheduler`], [`SchedulerHandle`]          |
//! | **Tasks**         | One-shot async or blocking units of work.                     | [`Task`], [`TaskFn`], [`BlockingFn`]        |
//! | **Subscriber API**| Hook into scheduling events (logging, metrics, failures).     | [`Subscribe`], [`Event`], [`EventKind`]     |
//! | **Errors**        | Typed errors for submission, runtime and task outcomes.       | [`SubmitError`], [`RuntimeError`], [`TaskError`] |
//! | **Configuration** | Concurrency cap, intake and bus capacities.                   | [`Config`]                                  |
//! | **Introspection** | Running / queued / worker counts.                             | [`Stats`]                                   |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use stickyvisor::{Config, Scheduler, TaskError, TaskFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::default();
//!     cfg.max_concurrent = 2;
//!
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn stickyvisor::Subscribe>> = vec![Arc::new(stickyvisor::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn stickyvisor::Subscribe>> = Vec::new();
//!
//!     let sched = Scheduler::builder(cfg).with_subscribers(subs).build();
//!
//!     for (user, n) in [("alice", 1), ("bob", 1), ("alice", 2)] {
//!         sched
//!             .submit(user, TaskFn::new(move || async move {
//!                 println!("{user}: event {n}");
//!                 Ok::<_, TaskError>(())
//!             }))
//!             .await?;
//!     }
//!
//!     // Wait for everything accepted so far, then stop.
//!     sched.shutdown().await?;
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use core::{Config, Scheduler, SchedulerBuilder, SchedulerHandle, Stats};
pub use error::{RuntimeError, SubmitError, TaskError};
pub use events::{Event, EventKind};
pub use subscribers::Subscribe;
pub use tasks::{BlockingFn, BoxTaskFuture, Key, Submission, Task, TaskFn, TaskRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
