use std::{marker::PhantomData, sync::Arc};

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use super::{
    config::Config,
    coordinator::{Coordinator, CoordinatorParams},
    scheduler::Scheduler,
    stats::Stats,
};
use crate::{
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
    tasks::Key,
};

/// Builder for constructing a [`Scheduler`] with optional subscribers.
pub struct SchedulerBuilder<K> {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    _key: PhantomData<fn() -> K>,
}

impl<K: Key> SchedulerBuilder<K> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            _key: PhantomData,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (dispatch, queueing, failures, drain)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the scheduler and spawns its coordinator.
    ///
    /// This consumes the builder and initializes all runtime components:
    /// - Event bus for broadcasting
    /// - Subscriber workers and their listener (only if any subscriber is set)
    /// - Coordinator loop
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Scheduler<K> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let (tx, intake) = mpsc::channel(self.cfg.intake_capacity_clamped());
        let (stats_tx, stats_rx) = watch::channel(Stats::default());
        let shutdown = CancellationToken::new();
        let finished = CancellationToken::new();

        // subscribe before the coordinator can publish anything
        let listener = if self.subscribers.is_empty() {
            None
        } else {
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            Some(Scheduler::<K>::subscriber_listener(
                &bus,
                set,
                finished.clone(),
            ))
        };

        let coordinator = Coordinator::new(
            &self.cfg,
            CoordinatorParams {
                intake,
                bus,
                stats: stats_tx,
                shutdown: shutdown.clone(),
                finished: finished.clone(),
            },
        );
        let join = tokio::spawn(coordinator.run());

        Scheduler::new_internal(tx, shutdown, stats_rx, join, listener, finished)
    }
}
