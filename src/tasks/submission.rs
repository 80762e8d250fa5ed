use std::fmt;

use crate::tasks::{Key, Task, TaskRef};

/// `(key, task)` pair: the unit passed across the scheduler boundary.
///
/// Immutable once created; the coordinator either queues it or hands its task
/// to the key's worker, which executes it exactly once.
pub struct Submission<K> {
    key: K,
    task: TaskRef,
}

impl<K: Key> Submission<K> {
    /// Creates a submission, boxing the task.
    pub fn new(key: K, task: impl Task) -> Self {
        Self {
            key,
            task: Box::new(task),
        }
    }

    /// Creates a submission from an already boxed task.
    pub fn from_boxed(key: K, task: TaskRef) -> Self {
        Self { key, task }
    }

    /// Affinity key.
    pub fn key(&self) -> &K {
        &self.key
    }

    pub(crate) fn into_parts(self) -> (K, TaskRef) {
        (self.key, self.task)
    }
}

impl<K: fmt::Debug> fmt::Debug for Submission<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submission")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
