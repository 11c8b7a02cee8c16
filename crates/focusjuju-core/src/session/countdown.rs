//! Countdown timer.
//!
//! Wall-clock based: every `tick()` subtracts the real monotonic time since
//! the previous mark instead of assuming a fixed 1000 ms step, so a late
//! tick (suspended process, busy runtime) never makes the timer fall behind.
//! The countdown owns no thread or timer of its own; the session host calls
//! `tick()` from its tick source.

use std::time::Instant;

/// Result of feeding one tick into the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed.
    Idle,
    /// Time was consumed, the countdown keeps running.
    Advanced { remaining_secs: u64 },
    /// Remaining time reached zero. Reported exactly once.
    Expired,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    total_ms: u64,
    remaining_ms: u64,
    /// Monotonic mark of the last flush; `Some` exactly while running.
    last_mark: Option<Instant>,
    expired: bool,
}

impl Countdown {
    pub fn new(duration_secs: u64) -> Self {
        let total_ms = duration_secs.saturating_mul(1000);
        Self {
            total_ms,
            remaining_ms: total_ms,
            last_mark: None,
            expired: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.last_mark.is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Whole seconds left, rounded up so a fresh 5 s countdown shows 5
    /// until the first full second has passed.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms.div_ceil(1000)
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.total_ms - self.remaining_ms
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin (or resume) decrementing. Returns `false` when already running
    /// or expired, in which case nothing changes.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() || self.expired {
            return false;
        }
        self.last_mark = Some(now);
        true
    }

    /// Stop decrementing, keeping the remaining time. Returns `false` when
    /// the countdown was not running.
    pub fn pause(&mut self, now: Instant) -> bool {
        if !self.is_running() {
            return false;
        }
        self.flush(now);
        self.last_mark = None;
        true
    }

    /// Halt the countdown for good; the caller decides why it stopped.
    pub fn stop(&mut self, now: Instant) {
        self.flush(now);
        self.last_mark = None;
    }

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }
        self.flush(now);
        if self.remaining_ms == 0 {
            self.expired = true;
            self.last_mark = None;
            return TickOutcome::Expired;
        }
        TickOutcome::Advanced {
            remaining_secs: self.remaining_secs(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn flush(&mut self, now: Instant) {
        if let Some(last) = self.last_mark {
            // A clock that appears to run backwards consumes nothing.
            let elapsed = now.saturating_duration_since(last).as_millis();
            let elapsed = u64::try_from(elapsed).unwrap_or(u64::MAX);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed).min(self.total_ms);
            self.last_mark = Some(now);
        }
    }
}
