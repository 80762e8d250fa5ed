//! # Event subscribers for the stickyvisor runtime.
//!
//! This module provides the [`Subscribe`] trait, the internal fan-out `SubscriberSet`
//! and built-in implementations for handling runtime events broadcast through
//! the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Coordinator / KeyWorker ── publish(Event) ──► Bus ──► subscriber_listener
//!                                                              │
//!                                                              ▼
//!                                                        SubscriberSet::emit
//!                                                   ┌──────────┼──────────┐
//!                                                   ▼          ▼          ▼
//!                                               LogWriter   Metrics    Custom
//! ```
//!
//! Subscribers are the out-of-band channel for task failures: the scheduler never
//! returns task results to the submitter, it reports `TaskFailed` / `TaskPanicked` here.
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use stickyvisor::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct FailureCounter;
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if matches!(event.kind, EventKind::TaskFailed | EventKind::TaskPanicked) {
//!             // increment failure counter
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "failure-counter"
//!     }
//! }
//! ```

//!
//! The fan-out set itself stays internal; only the scheduler builder creates one:
//! ```compile_fail
//! use stickyvisor::SubscriberSet;
//! ```

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod embedded;

pub(crate) use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
