//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`Event`] to multiple subscribers
//! **without awaiting** their processing.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside subscribers are caught and reported as `SubscriberPanicked`.
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No retries on per-subscriber queue overflow (events are dropped for that
//!   subscriber and `SubscriberOverflow` is published).
//!
//! ## Diagram
//! ```text
//!    emit(&Event)
//!        │                        (Arc-clone per interested subscriber)
//!        ├── wants? ──► [queue S1] ─► worker S1 ─► on_event()
//!        ├── wants? ──► [queue S2] ─► worker S2 ─► on_event()
//!        └── wants? ──► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::error::TaskError;
use crate::events::{Bus, Event};
use crate::subscribers::Subscribe;

/// Per-subscriber channel metadata.
struct SubscriberChannel {
    sub: Arc<dyn Subscribe>,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for multiple event subscribers.
///
/// Manages per-subscriber queues and worker tasks, providing:
/// - **Concurrent delivery**: events sent to all subscribers simultaneously
/// - **Isolation**: each subscriber has dedicated queue and worker
/// - **Panic safety**: panics caught and reported, don't crash the scheduler
/// - **Overflow handling**: dropped events reported via `SubscriberOverflow`
pub(crate) struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker task per subscriber.
    ///
    /// Minimum queue capacity is 1 (enforced).
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let s = Arc::clone(&sub);
            let bus_for_worker = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = s.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = TaskError::from_panic(panic_err).as_message();
                        bus_for_worker.publish(Event::subscriber_panicked(s.name(), info));
                    }
                }
            });
            channels.push(SubscriberChannel { sub, sender: tx });
            workers.push(handle);
        }
        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Emits an event to all interested subscribers (clones the event once).
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Emits a pre-allocated `Arc<Event>` to all interested subscribers.
    ///
    /// Overflow of a `SubscriberOverflow` event is not re-published (no feedback loop).
    pub fn emit_arc(&self, event: Arc<Event>) {
        let is_overflow_evt = event.is_subscriber_overflow();

        for channel in &self.channels {
            if !channel.sub.wants(event.kind) {
                continue;
            }
            let reason = match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !is_overflow_evt {
                self.bus
                    .publish(Event::subscriber_overflow(channel.sub.name(), reason));
            }
        }
    }

    /// Gracefully shuts down all subscriber workers.
    ///
    /// Queued events are still delivered before the workers exit.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    struct Recorder {
        seen: Mutex<Vec<EventKind>>,
        only_failures: bool,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().await.push(event.kind);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }

        fn wants(&self, kind: EventKind) -> bool {
            !self.only_failures || matches!(kind, EventKind::TaskFailed)
        }
    }

    struct Exploder;

    #[async_trait]
    impl Subscribe for Exploder {
        async fn on_event(&self, _event: &Event) {
            panic!("exploder");
        }

        fn name(&self) -> &'static str {
            "exploder"
        }
    }

    #[tokio::test]
    async fn test_fan_out_respects_interest() {
        let all = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
            only_failures: false,
        });
        let failures = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
            only_failures: true,
        });
        let set = SubscriberSet::new(vec![all.clone(), failures.clone()], Bus::new(16));

        set.emit(&Event::new(EventKind::TaskStarting));
        set.emit(&Event::new(EventKind::TaskFailed));
        set.shutdown().await;

        assert_eq!(
            *all.seen.lock().await,
            vec![EventKind::TaskStarting, EventKind::TaskFailed]
        );
        assert_eq!(*failures.seen.lock().await, vec![EventKind::TaskFailed]);
    }

    #[tokio::test]
    async fn test_subscriber_panic_is_reported() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Exploder)], bus.clone());

        set.emit(&Event::new(EventKind::TaskCompleted));
        set.shutdown().await;

        let ev = rx.recv().await.expect("panic event");
        assert!(ev.is_subscriber_panic());
        assert_eq!(ev.key.as_deref(), Some("exploder"));
        assert_eq!(ev.reason.as_deref(), Some("panic: exploder"));
    }
}
