//! Rate limiting for mouse-move samples and the single-slot delayed commit
//! that decides when a raise actually happens.

use std::time::Duration;

use tokio::time::Instant;

/// Drops samples that arrive less than `interval` after the last sample that
/// was let through. Timestamps are nanoseconds on any monotonic clock.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ns: u64,
    last_processed_ns: Option<u64>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ns: u64::try_from(interval.as_nanos()).unwrap_or(u64::MAX),
            last_processed_ns: None,
        }
    }

    /// Returns true if the sample should be processed, and records it if so.
    pub fn admit(&mut self, timestamp_ns: u64) -> bool {
        if let Some(last) = self.last_processed_ns
            && timestamp_ns.saturating_sub(last) < self.interval_ns
        {
            return false;
        }
        self.last_processed_ns = Some(timestamp_ns);
        true
    }

    pub fn reset(&mut self) { self.last_processed_ns = None; }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingRaise<C> {
    pub candidate: C,
    pub deadline: Instant,
}

/// Holds at most one pending candidate. Scheduling replaces whatever was
/// pending, so only the last candidate seen within a delay window commits.
#[derive(Debug)]
pub struct Debouncer<C> {
    delay: Duration,
    pending: Option<PendingRaise<C>>,
}

impl<C> Debouncer<C> {
    pub fn new(delay: Duration) -> Self { Self { delay, pending: None } }

    pub fn delay(&self) -> Duration { self.delay }

    /// Arms (or re-arms) the timer for `candidate`. Returns the candidate that
    /// was superseded, if any.
    pub fn schedule(&mut self, candidate: C, now: Instant) -> Option<C> {
        let previous = self.pending.replace(PendingRaise {
            candidate,
            deadline: now + self.delay,
        });
        previous.map(|p| p.candidate)
    }

    /// Drops the pending candidate without committing it.
    pub fn cancel(&mut self) -> Option<C> { self.pending.take().map(|p| p.candidate) }

    pub fn deadline(&self) -> Option<Instant> { self.pending.as_ref().map(|p| p.deadline) }

    pub fn pending(&self) -> Option<&C> { self.pending.as_ref().map(|p| &p.candidate) }

    pub fn is_pending(&self) -> bool { self.pending.is_some() }

    /// Takes the candidate if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<C> {
        match &self.pending {
            Some(p) if p.deadline <= now => self.pending.take().map(|p| p.candidate),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    #[test]
    fn throttle_admits_first_sample() {
        let mut t = Throttle::new(Duration::from_millis(50));
        assert!(t.admit(123));
    }

    #[test]
    fn throttle_holds_floor_under_fast_input() {
        let mut t = Throttle::new(Duration::from_millis(50));
        // A sample every 8ms for one second.
        let admitted: Vec<u64> = (0..125).map(|i| i * 8 * MS).filter(|&ts| t.admit(ts)).collect();
        assert!(admitted.windows(2).all(|w| w[1] - w[0] >= 50 * MS));
        // 0, 56, 112, ... one admitted sample per 56ms step.
        assert_eq!(admitted.len(), 18);
    }

    #[test]
    fn throttle_measures_from_last_processed_sample() {
        let mut t = Throttle::new(Duration::from_millis(50));
        assert!(t.admit(0));
        assert!(!t.admit(30 * MS));
        assert!(!t.admit(49 * MS));
        assert!(t.admit(50 * MS));
        assert!(!t.admit(99 * MS));
        assert!(t.admit(100 * MS));
    }

    #[test]
    fn throttle_tolerates_clock_going_backwards() {
        let mut t = Throttle::new(Duration::from_millis(50));
        assert!(t.admit(100 * MS));
        assert!(!t.admit(10 * MS));
        t.reset();
        assert!(t.admit(10 * MS));
    }

    #[test]
    fn schedule_supersedes_previous_candidate() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        assert_eq!(d.schedule("c1", start), None);
        assert_eq!(d.schedule("c2", start + Duration::from_millis(40)), Some("c1"));
        assert_eq!(d.pending(), Some(&"c2"));
        assert_eq!(d.deadline(), Some(start + Duration::from_millis(140)));
    }

    #[test]
    fn only_last_candidate_commits_after_its_own_delay() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        d.schedule("c1", start);
        d.schedule("c2", start + Duration::from_millis(40));
        assert_eq!(d.take_due(start + Duration::from_millis(100)), None);
        assert_eq!(d.take_due(start + Duration::from_millis(139)), None);
        assert_eq!(d.take_due(start + Duration::from_millis(140)), Some("c2"));
        assert_eq!(d.take_due(start + Duration::from_millis(500)), None);
    }

    #[test]
    fn cancel_prevents_commit() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        d.schedule("c1", start);
        assert_eq!(d.cancel(), Some("c1"));
        assert!(!d.is_pending());
        assert_eq!(d.take_due(start + Duration::from_millis(200)), None);
        assert_eq!(d.cancel(), None);
    }
}
