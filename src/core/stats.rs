//! # Coordinator snapshot.
//!
//! The coordinator owns every counter; after each processed event it publishes a
//! copy through a `tokio::sync::watch` channel. Readers never touch scheduler state.

/// Point-in-time view of the scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Tasks executing right now.
    pub running: usize,
    /// Live key workers (one per key with queued or running work).
    pub workers: usize,
    /// Tasks waiting in per-key pending queues.
    pub queued: usize,
    /// Submissions accepted by the coordinator.
    pub submitted: u64,
    /// Tasks that finished (any outcome).
    pub completed: u64,
    /// Tasks that returned an error or panicked.
    pub failed: u64,
}

impl Stats {
    /// True if nothing is running, queued, or owned by a worker.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.running == 0 && self.workers == 0 && self.queued == 0
    }
}
