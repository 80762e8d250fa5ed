//! # Admission throttle
//!
//! Counts tasks that are **executing** (not queued) and decides whether the
//! coordinator may take the next submission off the intake.
//!
//! ## Rules
//! - `limit = None`: always admits.
//! - `limit = Some(n)`: admits while `running < n`. At `running == n` the coordinator
//!   stops reading the intake and only observes completions until one frees a slot.
//! - Handing a queued successor to a worker after a completion is a release followed
//!   by an acquire in the same coordinator iteration; it never needs admission.

/// Running-task counter with an optional ceiling.
#[derive(Debug)]
pub(super) struct Admission {
    limit: Option<usize>,
    running: usize,
}

impl Admission {
    pub fn new(limit: Option<usize>) -> Self {
        Self { limit, running: 0 }
    }

    /// True if a new submission may be accepted now.
    #[inline]
    pub fn admits(&self) -> bool {
        self.limit.is_none_or(|n| self.running < n)
    }

    /// True if the ceiling has been reached.
    #[inline]
    pub fn is_saturated(&self) -> bool {
        !self.admits()
    }

    /// Records a task handed to a worker.
    #[inline]
    pub fn acquire(&mut self) {
        self.running += 1;
        debug_assert!(self.limit.is_none_or(|n| self.running <= n));
    }

    /// Records a task completion.
    #[inline]
    pub fn release(&mut self) {
        debug_assert!(self.running > 0, "release without acquire");
        self.running = self.running.saturating_sub(1);
    }

    #[inline]
    pub fn running(&self) -> usize {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_always_admits() {
        let mut adm = Admission::new(None);
        for _ in 0..100 {
            assert!(adm.admits());
            adm.acquire();
        }
        assert_eq!(adm.running(), 100);
    }

    #[test]
    fn test_limit_is_hard_ceiling() {
        let mut adm = Admission::new(Some(2));
        adm.acquire();
        assert!(adm.admits());
        adm.acquire();
        assert!(adm.is_saturated());

        adm.release();
        assert!(adm.admits());
        assert_eq!(adm.running(), 1);
    }

    #[test]
    fn test_successor_handoff_keeps_count() {
        let mut adm = Admission::new(Some(1));
        adm.acquire();
        adm.release();
        adm.acquire();
        assert_eq!(adm.running(), 1);
        assert!(adm.is_saturated());
    }
}
