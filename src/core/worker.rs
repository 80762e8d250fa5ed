//! # KeyWorker: sequential executor for one key.
//!
//! A key worker is an actor owned by the coordinator. It is spawned together with
//! the first task of its key, receives further tasks one at a time, and exits when
//! the coordinator retires it by dropping the sending half of its channel.
//!
//! ## States
//! ```text
//!            spawn(first task)
//!                  │
//!                  ▼
//!   ┌──────────► Running ── run_once() ──► report Completion{key}
//!   │                                            │
//!   │  coordinator sends next task               ▼
//!   └─────────────────────────────────── AwaitingNext
//!                                                │ channel closed (retire)
//!                                                ▼
//!                                             Retired
//! ```
//!
//! ## Rules
//! - At most **one** task in flight; tasks run in the order the coordinator sends them.
//! - A completion is reported for **every** task, whatever its outcome. If the worker
//!   itself dies first, the coordinator reports it from the worker's `JoinError`.
//! - The worker never decides to stop on its own while its channel is open.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    core::runner::run_once,
    error::TaskError,
    events::Bus,
    tasks::{Key, TaskRef},
};

/// Completion notice sent from a key worker to the coordinator.
pub(super) struct Completion<K> {
    /// Key whose task just finished.
    pub key: K,
    /// What the task returned (panics already converted).
    pub outcome: Result<(), TaskError>,
}

/// Executes the tasks of a single key, strictly one at a time.
pub(super) struct KeyWorker<K> {
    key: K,
    label: Arc<str>,
    tasks: mpsc::UnboundedReceiver<TaskRef>,
    done: mpsc::UnboundedSender<Completion<K>>,
    bus: Bus,
}

impl<K: Key> KeyWorker<K> {
    pub fn new(
        key: K,
        label: Arc<str>,
        tasks: mpsc::UnboundedReceiver<TaskRef>,
        done: mpsc::UnboundedSender<Completion<K>>,
        bus: Bus,
    ) -> Self {
        Self {
            key,
            label,
            tasks,
            done,
            bus,
        }
    }

    /// Runs until the coordinator retires the worker (channel closed).
    ///
    /// Also exits if the coordinator is gone, since nobody could hand it more work.
    pub async fn run(mut self) {
        while let Some(task) = self.tasks.recv().await {
            let outcome = run_once(task, &self.label, &self.bus).await;
            let done = Completion {
                key: self.key.clone(),
                outcome,
            };
            if self.done.send(done).is_err() {
                break;
            }
        }
    }
}
