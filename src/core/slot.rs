//! # Per-key slots: worker channel + pending queue.
//!
//! A slot exists for a key **iff** that key has a task running or queued. It holds
//! the sending half of the key worker's channel and the FIFO of submissions that
//! arrived while the worker was busy.
//!
//! ```text
//! slots: HashMap<K, Slot>
//!   "a" ─► Slot { worker: tx_a, queue: [t3, t5] }   (t1 running on worker "a")
//!   "b" ─► Slot { worker: tx_b, queue: [] }         (t2 running on worker "b")
//! ```
//!
//! ## Invariants
//! - Every slot has exactly one task in flight on its worker.
//! - Dropping a slot drops its sender; the worker sees its channel close and exits.
//! - `queued()` is the sum of all queue lengths.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::tasks::{Key, TaskRef};

/// State of a single key.
pub(super) struct Slot {
    /// `Debug` rendering of the key, computed once per worker.
    pub label: Arc<str>,
    /// Channel to the key worker.
    pub worker: mpsc::UnboundedSender<TaskRef>,
    /// Pending tasks (FIFO order).
    pub queue: VecDeque<TaskRef>,
}

/// Result of advancing a slot after its worker reported a completion.
pub(super) enum Advance {
    /// Next queued task was handed to the worker.
    Dispatched { label: Arc<str>, queued: usize },
    /// Backlog empty; slot removed and worker released.
    Retired { label: Arc<str> },
    /// Worker channel is gone; the task must go to a fresh worker (slot and queue kept).
    Lost {
        task: TaskRef,
        label: Arc<str>,
        queued: usize,
    },
    /// No slot for this key.
    Unknown,
}

/// All live slots, owned by the coordinator.
pub(super) struct SlotTable<K> {
    slots: HashMap<K, Slot>,
    queued: usize,
}

impl<K: Key> SlotTable<K> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            queued: 0,
        }
    }

    /// Appends `task` to the key's queue if the key has a live worker.
    ///
    /// Gives the task back when there is no slot, so the caller can spawn a worker.
    pub fn enqueue(&mut self, key: &K, task: TaskRef) -> Result<(Arc<str>, usize), TaskRef> {
        match self.slots.get_mut(key) {
            Some(slot) => {
                slot.queue.push_back(task);
                self.queued += 1;
                Ok((Arc::clone(&slot.label), slot.queue.len()))
            }
            None => Err(task),
        }
    }

    /// Registers a freshly spawned worker that already holds its first task.
    pub fn insert(&mut self, key: K, label: Arc<str>, worker: mpsc::UnboundedSender<TaskRef>) {
        let prev = self.slots.insert(
            key,
            Slot {
                label,
                worker,
                queue: VecDeque::new(),
            },
        );
        debug_assert!(prev.is_none(), "slot replaced while live");
    }

    /// Replaces a lost worker's channel, keeping the queue.
    pub fn rebind(&mut self, key: &K, worker: mpsc::UnboundedSender<TaskRef>) -> bool {
        match self.slots.get_mut(key) {
            Some(slot) => {
                slot.worker = worker;
                true
            }
            None => false,
        }
    }

    /// Hands the next queued task to the worker, or retires the slot.
    pub fn advance(&mut self, key: &K) -> Advance {
        let Some(slot) = self.slots.get_mut(key) else {
            return Advance::Unknown;
        };

        let Some(next) = slot.queue.pop_front() else {
            let Some(slot) = self.slots.remove(key) else {
                return Advance::Unknown;
            };
            return Advance::Retired { label: slot.label };
        };
        self.queued -= 1;

        match slot.worker.send(next) {
            Ok(()) => Advance::Dispatched {
                label: Arc::clone(&slot.label),
                queued: slot.queue.len(),
            },
            Err(mpsc::error::SendError(task)) => Advance::Lost {
                task,
                label: Arc::clone(&slot.label),
                queued: slot.queue.len(),
            },
        }
    }

    /// True if `key` has a task in flight.
    pub fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// Number of live workers.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total pending tasks across all keys.
    pub fn queued(&self) -> usize {
        self.queued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::tasks::TaskFn;

    fn task() -> TaskRef {
        Box::new(TaskFn::new(|| async { Ok::<_, TaskError>(()) }))
    }

    #[test]
    fn test_enqueue_without_slot_returns_task() {
        let mut table: SlotTable<&str> = SlotTable::new();
        assert!(table.enqueue(&"a", task()).is_err());
        assert_eq!(table.queued(), 0);
    }

    #[test]
    fn test_queue_drains_in_order_then_retires() {
        let mut table: SlotTable<&str> = SlotTable::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        table.insert("a", "\"a\"".into(), tx);

        let (_, depth) = table.enqueue(&"a", task()).ok().expect("slot exists");
        assert_eq!(depth, 1);
        let (_, depth) = table.enqueue(&"a", task()).ok().expect("slot exists");
        assert_eq!(depth, 2);
        assert_eq!(table.queued(), 2);

        assert!(matches!(table.advance(&"a"), Advance::Dispatched { queued: 1, .. }));
        assert!(matches!(table.advance(&"a"), Advance::Dispatched { queued: 0, .. }));
        assert_eq!(table.queued(), 0);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());

        assert!(matches!(table.advance(&"a"), Advance::Retired { .. }));
        assert!(table.is_empty());
        // sender dropped with the slot
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_closed_worker_reports_lost_task() {
        let mut table: SlotTable<u32> = SlotTable::new();
        let (tx, rx) = mpsc::unbounded_channel();
        table.insert(7, "7".into(), tx);
        drop(rx);

        assert!(table.enqueue(&7, task()).is_ok());
        assert!(matches!(table.advance(&7), Advance::Lost { queued: 0, .. }));
        assert_eq!(table.len(), 1);

        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(table.rebind(&7, tx));
    }

    #[test]
    fn test_unknown_key() {
        let mut table: SlotTable<u32> = SlotTable::new();
        assert!(matches!(table.advance(&1), Advance::Unknown));
        assert!(!table.rebind(&1, mpsc::unbounded_channel().0));
    }
}
