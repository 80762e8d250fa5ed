//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [worker-spawned] key="a"
//! [starting] key="a" running=1 queued=0
//! [queued] key="a" depth=1
//! [failed] key="a" err="execution failed: boom"
//! [completed] key="a"
//! [worker-retired] key="a"
//! [throttled] running=2
//! [shutdown-requested] running=1
//! [drain-completed]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let key = e.key.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::TaskQueued => {
                println!("[queued] key={key} depth={:?}", e.queued);
            }
            EventKind::TaskStarting => {
                println!(
                    "[starting] key={key} running={:?} queued={:?}",
                    e.running, e.queued
                );
            }
            EventKind::TaskCompleted => println!("[completed] key={key}"),
            EventKind::TaskFailed => println!("[failed] key={key} err={:?}", e.reason),
            EventKind::TaskPanicked => println!("[panicked] key={key} info={:?}", e.reason),
            EventKind::WorkerSpawned => println!("[worker-spawned] key={key}"),
            EventKind::WorkerRetired => println!("[worker-retired] key={key}"),
            EventKind::AdmissionThrottled => println!("[throttled] running={:?}", e.running),
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested] running={:?}", e.running);
            }
            EventKind::DrainCompleted => println!("[drain-completed]"),
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] subscriber={key} reason={:?}", e.reason);
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={key} info={}",
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
