//! # Scheduler configuration.
//!
//! Provides [`Config`], the centralized settings for one [`Scheduler`](crate::Scheduler).
//!
//! ## Sentinel values
//! - `max_concurrent = 0` → unlimited (no admission throttling)
//! - `intake_capacity = 0`, `bus_capacity = 0` → clamped to 1

/// Configuration for the scheduler runtime.
///
/// ## Field semantics
/// - `max_concurrent`: hard ceiling on simultaneously **running** tasks across all keys
///   (`0` = unlimited). Queued tasks are never limited.
/// - `intake_capacity`: buffer between producers and the coordinator; when full,
///   `submit()` waits and `try_submit()` returns `Full`.
/// - `bus_capacity`: event bus ring buffer size (min 1).
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of tasks running at the same instant.
    ///
    /// - `0` = unlimited
    /// - `n > 0` = at most `n` tasks run simultaneously, however many keys have work
    pub max_concurrent: usize,

    /// Capacity of the submission channel feeding the coordinator.
    pub intake_capacity: usize,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages
    /// skip older items.
    pub bus_capacity: usize,
}

impl Config {
    /// Builds a default config with a signed concurrency limit.
    ///
    /// Any `max_concurrency <= 0` means unlimited.
    ///
    /// # Example
    /// ```
    /// use stickyvisor::Config;
    ///
    /// assert_eq!(Config::with_limit(-1).concurrency_limit(), None);
    /// assert_eq!(Config::with_limit(0).concurrency_limit(), None);
    /// assert_eq!(Config::with_limit(4).concurrency_limit(), Some(4));
    /// ```
    pub fn with_limit(max_concurrency: isize) -> Self {
        Self {
            max_concurrent: usize::try_from(max_concurrency).unwrap_or(0),
            ..Self::default()
        }
    }

    /// Returns the global concurrency limit as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → at most `n` concurrent tasks
    #[inline]
    pub fn concurrency_limit(&self) -> Option<usize> {
        if self.max_concurrent == 0 {
            None
        } else {
            Some(self.max_concurrent)
        }
    }

    /// Returns the intake capacity clamped to a minimum of 1.
    #[inline]
    pub fn intake_capacity_clamped(&self) -> usize {
        self.intake_capacity.max(1)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `max_concurrent = 0` (unlimited)
    /// - `intake_capacity = 1024`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            max_concurrent: 0,
            intake_capacity: 1024,
            bus_capacity: 1024,
        }
    }
}
