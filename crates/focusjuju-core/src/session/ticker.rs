//! Tick sources and the registry that counts them.
//!
//! Every scheduled callback the session host owns (the countdown interval,
//! the encouragement interval, an in-flight message fetch) holds a
//! [`TickLease`]. Dropping the owner drops the lease, so the registry count
//! is exactly the number of live tick sources. Tests use it to prove that
//! a restart never leaves two sources of one kind and that teardown leaves
//! none at all.

use std::future::pending;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSource {
    Countdown,
    Encouragement,
    MessageFetch,
}

impl TickSource {
    const ALL: [TickSource; 3] = [
        TickSource::Countdown,
        TickSource::Encouragement,
        TickSource::MessageFetch,
    ];

    fn slot(self) -> usize {
        match self {
            TickSource::Countdown => 0,
            TickSource::Encouragement => 1,
            TickSource::MessageFetch => 2,
        }
    }
}

/// Shared counter of live tick sources, one slot per [`TickSource`].
#[derive(Debug, Clone, Default)]
pub struct TickRegistry {
    live: Arc<[AtomicUsize; 3]>,
}

impl TickRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self, source: TickSource) -> usize {
        self.live[source.slot()].load(Ordering::SeqCst)
    }

    pub fn total_active(&self) -> usize {
        TickSource::ALL.iter().map(|&s| self.active(s)).sum()
    }

    pub fn lease(&self, source: TickSource) -> TickLease {
        self.live[source.slot()].fetch_add(1, Ordering::SeqCst);
        TickLease {
            registry: self.clone(),
            source,
        }
    }
}

/// Proof of one live tick source. Released on drop.
#[derive(Debug)]
pub struct TickLease {
    registry: TickRegistry,
    source: TickSource,
}

impl TickLease {
    pub fn source(&self) -> TickSource {
        self.source
    }
}

impl Drop for TickLease {
    fn drop(&mut self) {
        self.registry.live[self.source.slot()].fetch_sub(1, Ordering::SeqCst);
    }
}

/// A periodic tick source. The first tick arrives one full period after
/// creation; missed ticks are skipped rather than replayed in a burst.
#[derive(Debug)]
pub struct Ticker {
    interval: Interval,
    _lease: TickLease,
}

impl Ticker {
    pub fn every(period: Duration, lease: TickLease) -> Self {
        Self::after(period, period, lease)
    }

    /// Like [`Ticker::every`], but the first tick arrives after `first`.
    pub fn after(first: Duration, period: Duration, lease: TickLease) -> Self {
        let mut interval = interval_at(Instant::now() + first, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            interval,
            _lease: lease,
        }
    }

    pub async fn tick(&mut self) -> Instant {
        self.interval.tick().await
    }
}

/// Wait for the next tick of an optional source; never resolves when the
/// slot is empty, which lets it sit in a `select!` unconditionally.
pub async fn next_tick(ticker: &mut Option<Ticker>) -> Instant {
    match ticker {
        Some(t) => t.tick().await,
        None => pending().await,
    }
}
