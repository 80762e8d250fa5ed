//! # Example: per_key_pipeline
//!
//! Processes a stream of account events: each account's events are applied in order,
//! different accounts are processed in parallel, at most 2 at a time.
//!
//! Shows how to:
//! - Attach the built-in [`LogWriter`] and a custom [`Subscribe`] implementation.
//! - Submit from several producers through cloned [`SchedulerHandle`]s.
//! - Drain with [`Scheduler::shutdown`] and read the final [`Stats`].
//!
//! ## Flow
//! ```text
//! producer-1 ──┐
//!              ├─► SchedulerHandle::submit(account, TaskFn)
//! producer-2 ──┘          │
//!                         ▼
//!                    Coordinator ──► KeyWorker("acc-1") ──► apply event
//!                         │     └──► KeyWorker("acc-2") ──► apply event
//!                         └─► Bus ──► LogWriter / FailureTally
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example per_key_pipeline --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use stickyvisor::{
    Config, Event, EventKind, LogWriter, Scheduler, SchedulerHandle, Stats, Subscribe, TaskError,
    TaskFn,
};

/// Counts failed and panicked tasks.
#[derive(Default)]
struct FailureTally {
    failures: AtomicU64,
}

#[async_trait::async_trait]
impl Subscribe for FailureTally {
    async fn on_event(&self, ev: &Event) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        eprintln!(
            "[tally] key={} reason={}",
            ev.key.as_deref().unwrap_or("<unknown>"),
            ev.reason.as_deref().unwrap_or("<none>")
        );
    }

    fn name(&self) -> &'static str {
        "failure-tally"
    }

    fn wants(&self, kind: EventKind) -> bool {
        matches!(kind, EventKind::TaskFailed | EventKind::TaskPanicked)
    }
}

/// Feeds `count` events for each account through `handle`.
async fn produce(
    handle: SchedulerHandle<String>,
    producer: u32,
    accounts: &[&str],
    count: u32,
) -> anyhow::Result<()> {
    for seq in 0..count {
        for account in accounts {
            let name = account.to_string();
            handle
                .submit(
                    name.clone(),
                    TaskFn::new(move || async move {
                        tokio::time::sleep(Duration::from_millis(15)).await;
                        if seq == 2 && producer == 2 {
                            return Err(TaskError::fail(format!("{name}: rejected event {seq}")));
                        }
                        println!("[{name}] applied event {producer}/{seq}");
                        Ok(())
                    }),
                )
                .await?;
        }
    }
    Ok(())
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> anyhow::Result<()> {
    let mut cfg = Config::default();
    cfg.max_concurrent = 2;

    let tally = Arc::new(FailureTally::default());
    let sched: Scheduler<String> = Scheduler::builder(cfg)
        .with_subscriber(Arc::new(LogWriter::new()))
        .with_subscriber(tally.clone())
        .build();

    let p1 = tokio::spawn(produce(sched.handle(), 1, &["acc-1", "acc-2"], 3));
    let p2 = tokio::spawn(produce(sched.handle(), 2, &["acc-2", "acc-3"], 3));
    p1.await??;
    p2.await??;

    sched.shutdown().await?;

    let Stats {
        submitted,
        completed,
        failed,
        ..
    } = sched.stats();
    println!("[main] submitted={submitted} completed={completed} failed={failed}");
    println!(
        "[main] tally saw {} failures",
        tally.failures.load(Ordering::Relaxed)
    );
    Ok(())
}
