//! # Runtime events emitted by the coordinator and key workers.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Task events**: one submission's path (queued, starting, completed, failed, panicked)
//! - **Worker events**: per-key worker lifecycle (spawned, retired)
//! - **Coordinator events**: admission throttling and the shutdown/drain protocol
//! - **Subscriber events**: fan-out problems (overflow, panic)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the key,
//! reasons and the coordinator's counters at the moment of the transition.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use stickyvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_key("\"user-42\"")
//!     .with_reason("boom")
//!     .with_running(3);
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.key.as_deref(), Some("\"user-42\""));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `key`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `key`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Shutdown events ===
    /// Intake closed; the coordinator entered the draining state.
    ///
    /// Sets:
    /// - `running`: tasks executing at that instant
    ShutdownRequested,

    /// Every accepted submission has run and every worker was joined.
    ///
    /// Sets:
    /// - `running`: always 0
    DrainCompleted,

    // === Coordinator events ===
    /// Concurrency cap reached; new submissions wait for a completion.
    ///
    /// Sets:
    /// - `running`: equal to the configured cap
    AdmissionThrottled,

    // === Worker events ===
    /// A key worker was spawned for a key with no live worker.
    ///
    /// Sets:
    /// - `key`
    WorkerSpawned,

    /// A key worker was retired because its backlog drained.
    ///
    /// Sets:
    /// - `key`
    WorkerRetired,

    // === Task events ===
    /// Submission appended to its key's pending queue (worker busy).
    ///
    /// Sets:
    /// - `key`
    /// - `queued`: pending depth for the key after the append
    TaskQueued,

    /// Submission handed to its key worker.
    ///
    /// Sets:
    /// - `key`
    /// - `running`: running count including this task
    /// - `queued`: pending depth left for the key
    TaskStarting,

    /// Task finished successfully.
    ///
    /// Sets:
    /// - `key`
    TaskCompleted,

    /// Task returned an error.
    ///
    /// Sets:
    /// - `key`
    /// - `reason`: failure message
    TaskFailed,

    /// Task panicked; the worker caught it and reported completion anyway.
    ///
    /// Sets:
    /// - `key`
    /// - `reason`: panic payload
    TaskPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// `Debug` rendering of the affinity key (or subscriber name for subscriber events).
    pub key: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Running count right after the transition.
    pub running: Option<usize>,
    /// Pending depth for the key right after the transition.
    pub queued: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            key: None,
            reason: None,
            running: None,
            queued: None,
        }
    }

    /// Attaches an already rendered key.
    #[inline]
    pub fn with_key(mut self, key: impl Into<Arc<str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attaches a key by rendering it with `Debug`.
    #[inline]
    pub fn with_debug_key<K: Debug + ?Sized>(self, key: &K) -> Self {
        self.with_key(format!("{key:?}"))
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the running count.
    #[inline]
    pub fn with_running(mut self, running: usize) -> Self {
        self.running = Some(running);
        self
    }

    /// Attaches the per-key pending depth.
    #[inline]
    pub fn with_queued(mut self, queued: usize) -> Self {
        self.queued = Some(queued);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_key(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_key(subscriber)
            .with_reason(info)
    }

    /// Creates the overflow event reported when the subscriber listener fell
    /// behind the bus and `skipped` events were lost for every subscriber.
    pub(crate) fn listener_lagged(skipped: u64) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_key("listener")
            .with_reason(format!("subscriber=listener reason=lagged skipped={skipped}"))
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::TaskQueued);
        let b = Event::new(EventKind::TaskStarting);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_listener_lag_is_an_overflow() {
        let ev = Event::listener_lagged(3);
        assert!(ev.is_subscriber_overflow());
        assert_eq!(ev.key.as_deref(), Some("listener"));
        assert_eq!(
            ev.reason.as_deref(),
            Some("subscriber=listener reason=lagged skipped=3")
        );
    }

    #[test]
    fn test_debug_key_rendering() {
        let ev = Event::new(EventKind::WorkerSpawned).with_debug_key(&("tenant", 7));
        assert_eq!(ev.key.as_deref(), Some("(\"tenant\", 7)"));
    }
}
