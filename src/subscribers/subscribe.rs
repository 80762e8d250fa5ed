//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into the
//! scheduler. Each subscriber is driven by a dedicated worker loop fed by a bounded
//! queue owned by the scheduler's internal subscriber set.
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching) – they do **not** block the
//!   coordinator, key workers, nor other subscribers.
//! - Each subscriber **declares** its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. If a queue overflows, events for that
//!   subscriber are **dropped** and a `SubscriberOverflow` event is published.
//! - [`Subscribe::wants`] filters by kind before anything is queued; a chatty
//!   scheduler (one `TaskStarting` per submission) should not fill the queue of a
//!   subscriber that only cares about failures.
//!
//! ## Example (skeleton)
//! ```rust
//! use stickyvisor::{Event, EventKind, Subscribe};
//!
//! struct Audit;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for Audit {
//!     async fn on_event(&self, ev: &Event) {
//!         // write audit record for ev.key...
//!         let _ = ev;
//!     }
//!     fn name(&self) -> &'static str { "audit" }
//!     fn queue_capacity(&self) -> usize { 512 }
//!     fn wants(&self, kind: EventKind) -> bool {
//!         matches!(kind, EventKind::TaskFailed | EventKind::TaskPanicked)
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }

    /// Whether events of `kind` should be delivered at all.
    fn wants(&self, kind: EventKind) -> bool {
        let _ = kind;
        true
    }
}
