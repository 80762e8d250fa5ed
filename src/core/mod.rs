//! Runtime core: coordinator, key workers and the scheduler facade.
//!
//! The only public API from this module is [`Scheduler`] (with its handle, builder,
//! config and stats). Everything else is owned by the coordinator task.
//!
//! ## Wiring
//! ```text
//!  producers ── submit(key, task) ──► [intake: bounded mpsc] ──┐
//!                                                              ▼
//!                                                   ┌─────────────────────┐
//!         ┌──── Completion{key} [unbounded mpsc] ──►│     Coordinator     │
//!         │                                         │  SlotTable (queues) │
//!         │                                         │  Admission (count)  │
//!         │                                         └──┬──────┬───────┬───┘
//!         │                                  TaskRef   │      │       │  watch<Stats>
//!         │                                            ▼      ▼       ▼
//!     KeyWorker "a"  KeyWorker "b"  ...  ◄─────────── (one per live key)
//!         │
//!         └──► run_once(task) ──► Bus ──► subscriber listener ──► SubscriberSet
//! ```
//!
//! Internal modules:
//! - [`coordinator`]: single-owner event loop (dispatch, queueing, retire, drain);
//! - [`worker`]: per-key sequential executor;
//! - [`runner`]: executes one task with panic isolation and event publishing;
//! - [`slot`]: per-key worker channel + pending queue bookkeeping;
//! - [`admission`]: running-task counter and concurrency ceiling.

mod admission;
mod builder;
mod config;
mod coordinator;
mod runner;
mod scheduler;
mod slot;
mod stats;
mod worker;


pub use builder::SchedulerBuilder;
pub use config::Config;
pub use scheduler::{Scheduler, SchedulerHandle};
pub use stats::Stats;
