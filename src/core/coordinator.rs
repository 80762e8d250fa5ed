//! # Coordinator: the single owner of scheduling state.
//!
//! The coordinator is one tokio task that owns the slot table (workers + pending
//! queues), the admission counter and the stats counters. It processes exactly one
//! event at a time, so no lock protects any of that state.
//!
//! ## Event loop
//! ```text
//! loop (biased select, one event per iteration):
//!   ├─► Completion{key} from a worker
//!   │      running -= 1
//!   │      ├─ queue[key] non-empty → pop front, hand to worker, running += 1
//!   │      └─ queue[key] empty     → retire worker (drop its channel)
//!   │
//!   ├─► KeyWorker exited
//!   │      panicked mid-task → treated as a failed Completion{key}
//!   │
//!   ├─► shutdown token cancelled (Accepting only)
//!   │      intake.close() → producers now get SubmitError::Closed
//!   │
//!   └─► Submission(key, task)   [only while running < max_concurrent]
//!          ├─ no worker for key → spawn worker with task, running += 1
//!          └─ worker busy       → queue[key].push_back(task)
//!
//! exit: intake exhausted && running == 0 → join all workers → DrainCompleted
//! ```
//!
//! ## Phases
//! - `Accepting`: intake open.
//! - `Closing`: intake closed; submissions already buffered are still honored.
//! - `Draining`: intake exhausted; only completions remain.
//!
//! ## Rules
//! - Admission gates **reading the intake**: at the cap, the coordinator observes
//!   completions only. Queued successors are dispatched regardless (release + acquire).
//! - `running` always equals the number of live workers (one task in flight each).
//! - A worker that dies without reporting (e.g. a panicking `K::clone`) releases its
//!   slot through its `JoinError`; queued successors move to a fresh worker.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::{
    sync::{mpsc, watch},
    task::{Id, JoinError, JoinSet},
};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        admission::Admission,
        config::Config,
        slot::{Advance, SlotTable},
        stats::Stats,
        worker::{Completion, KeyWorker},
    },
    error::TaskError,
    events::{Bus, Event, EventKind},
    tasks::{Key, Submission, TaskRef},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Accepting,
    Closing,
    Draining,
}

/// Channels and tokens wiring the coordinator to the scheduler facade.
pub(super) struct CoordinatorParams<K> {
    pub intake: mpsc::Receiver<Submission<K>>,
    pub bus: Bus,
    pub stats: watch::Sender<Stats>,
    /// Cancelled by `Scheduler::shutdown`.
    pub shutdown: CancellationToken,
    /// Cancelled by the coordinator when it exits (normally or by unwinding).
    pub finished: CancellationToken,
}

/// Serializes every scheduling decision.
pub(super) struct Coordinator<K: Key> {
    intake: mpsc::Receiver<Submission<K>>,
    done_tx: mpsc::UnboundedSender<Completion<K>>,
    done_rx: mpsc::UnboundedReceiver<Completion<K>>,

    slots: SlotTable<K>,
    admission: Admission,
    workers: JoinSet<()>,
    /// Key served by each live worker task.
    worker_keys: HashMap<Id, K>,

    bus: Bus,
    stats: watch::Sender<Stats>,
    submitted: u64,
    completed: u64,
    failed: u64,

    shutdown: CancellationToken,
    finished: CancellationToken,
}

impl<K: Key> Coordinator<K> {
    pub fn new(cfg: &Config, params: CoordinatorParams<K>) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            intake: params.intake,
            done_tx,
            done_rx,
            slots: SlotTable::new(),
            admission: Admission::new(cfg.concurrency_limit()),
            workers: JoinSet::new(),
            worker_keys: HashMap::new(),
            bus: params.bus,
            stats: params.stats,
            submitted: 0,
            completed: 0,
            failed: 0,
            shutdown: params.shutdown,
            finished: params.finished,
        }
    }

    /// Runs the event loop until the drain completes.
    pub async fn run(mut self) {
        let _finished = self.finished.clone().drop_guard();
        let mut phase = Phase::Accepting;

        while !(phase == Phase::Draining && self.admission.running() == 0) {
            tokio::select! {
                biased;

                Some(done) = self.done_rx.recv() => {
                    self.on_completion(done);
                }
                Some(exit) = self.workers.join_next_with_id() => {
                    self.on_worker_exit(exit);
                }
                _ = self.shutdown.cancelled(), if phase == Phase::Accepting => {
                    self.intake.close();
                    phase = Phase::Closing;
                    self.bus.publish(
                        Event::new(EventKind::ShutdownRequested)
                            .with_running(self.admission.running()),
                    );
                }
                msg = self.intake.recv(), if phase != Phase::Draining && self.admission.admits() => {
                    match msg {
                        Some(sub) => self.on_submission(sub),
                        None => phase = Phase::Draining,
                    }
                }
            }

            debug_assert_eq!(self.admission.running(), self.slots.len());
            self.publish_stats();
        }

        debug_assert!(self.slots.is_empty() && self.slots.queued() == 0);
        while let Some(exit) = self.workers.join_next_with_id().await {
            self.on_worker_exit(exit);
        }
        self.bus
            .publish(Event::new(EventKind::DrainCompleted).with_running(0));
        self.publish_stats();
    }

    /// Queues the submission behind its key's worker, or spawns a worker for it.
    fn on_submission(&mut self, sub: Submission<K>) {
        self.submitted += 1;
        let (key, task) = sub.into_parts();

        match self.slots.enqueue(&key, task) {
            Ok((label, depth)) => {
                self.bus.publish(
                    Event::new(EventKind::TaskQueued)
                        .with_key(label)
                        .with_queued(depth),
                );
            }
            Err(task) => {
                let label: Arc<str> = format!("{key:?}").into();
                let worker = self.start_worker(key.clone(), Arc::clone(&label), task);
                self.slots.insert(key, Arc::clone(&label), worker);
                self.dispatched(label, 0);

                if self.admission.is_saturated() {
                    self.bus.publish(
                        Event::new(EventKind::AdmissionThrottled)
                            .with_running(self.admission.running()),
                    );
                }
            }
        }
    }

    /// Feeds the key's next queued task to its worker, or retires the worker.
    fn on_completion(&mut self, done: Completion<K>) {
        self.admission.release();
        self.completed += 1;
        if done.outcome.is_err() {
            self.failed += 1;
        }

        match self.slots.advance(&done.key) {
            Advance::Dispatched { label, queued } => self.dispatched(label, queued),
            Advance::Retired { label } => {
                self.bus
                    .publish(Event::new(EventKind::WorkerRetired).with_key(label));
            }
            Advance::Lost {
                task,
                label,
                queued,
            } => {
                let worker = self.start_worker(done.key.clone(), Arc::clone(&label), task);
                self.slots.rebind(&done.key, worker);
                self.dispatched(label, queued);
            }
            Advance::Unknown => {}
        }
    }

    /// Spawns a key worker that already holds `first` in its channel.
    fn start_worker(
        &mut self,
        key: K,
        label: Arc<str>,
        first: TaskRef,
    ) -> mpsc::UnboundedSender<TaskRef> {
        let (tx, rx) = mpsc::unbounded_channel();
        // rx is still held here, so this send cannot fail
        let _ = tx.send(first);

        self.bus
            .publish(Event::new(EventKind::WorkerSpawned).with_key(Arc::clone(&label)));
        let worker = KeyWorker::new(key.clone(), label, rx, self.done_tx.clone(), self.bus.clone());
        let handle = self.workers.spawn(worker.run());
        self.worker_keys.insert(handle.id(), key);
        tx
    }

    /// Books a task handed to a worker.
    fn dispatched(&mut self, label: Arc<str>, queued: usize) {
        self.admission.acquire();
        self.bus.publish(
            Event::new(EventKind::TaskStarting)
                .with_key(label)
                .with_running(self.admission.running())
                .with_queued(queued),
        );
    }

    /// Forgets an exited worker; one that died mid-task counts as a failed completion.
    fn on_worker_exit(&mut self, exit: Result<(Id, ()), JoinError>) {
        let je = match exit {
            Ok((id, ())) => {
                self.worker_keys.remove(&id);
                return;
            }
            Err(je) => je,
        };
        let Some(key) = self.worker_keys.remove(&je.id()) else {
            return;
        };

        let outcome = if je.is_panic() {
            TaskError::from_panic(je.into_panic())
        } else {
            TaskError::Canceled
        };
        self.bus.publish(
            Event::new(EventKind::TaskPanicked)
                .with_debug_key(&key)
                .with_reason(format!("key worker died: {}", outcome.as_message())),
        );

        // a worker only dies between receiving a task and reporting it
        if self.slots.contains(&key) {
            self.on_completion(Completion {
                key,
                outcome: Err(outcome),
            });
        }
    }

    fn publish_stats(&self) {
        let next = Stats {
            running: self.admission.running(),
            workers: self.slots.len(),
            queued: self.slots.queued(),
            submitted: self.submitted,
            completed: self.completed,
            failed: self.failed,
        };
        self.stats.send_if_modified(|cur| {
            if *cur == next {
                false
            } else {
                *cur = next;
                true
            }
        });
    }
}
