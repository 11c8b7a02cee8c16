//! Encouragement cadence.
//!
//! Decides *when* a supportive message is due; picking the text is the
//! message source's job. Stopping the scheduler discards the current
//! window, so a pause/resume cycle restarts the full interval.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct EncouragementScheduler {
    interval: Duration,
    /// Start of the current cadence window; `Some` exactly while active.
    window_start: Option<Instant>,
    fired: u32,
}

impl EncouragementScheduler {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs),
            window_start: None,
            fired: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        self.window_start.is_some()
    }

    /// Number of encouragements fired so far in this session.
    pub fn fired(&self) -> u32 {
        self.fired
    }

    /// Open a fresh cadence window. No-op (returns `false`) if already active.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_active() {
            return false;
        }
        self.window_start = Some(now);
        true
    }

    /// Suspend the cadence, dropping any progress toward the next firing.
    pub fn stop(&mut self) -> bool {
        self.window_start.take().is_some()
    }

    /// Returns `true` when an encouragement is due at `now`.
    ///
    /// Fires at most once per call; a poll that arrives several windows
    /// late realigns to the most recent window boundary instead of
    /// bursting.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(start) = self.window_start else {
            return false;
        };
        if self.interval.is_zero() {
            return false;
        }
        let elapsed = now.saturating_duration_since(start);
        if elapsed < self.interval {
            return false;
        }
        let windows = (elapsed.as_millis() / self.interval.as_millis()) as u32;
        self.window_start = Some(start + self.interval * windows);
        self.fired += 1;
        true
    }
}
