//! # Shared Snapshot Types
//!
//! Plain data passed between the collecting side (allocator hooks, pause
//! recorders, `/proc` readers) and the reporting side. Everything here is an
//! immutable snapshot: built once per report and dropped afterwards.
//!
//! The crate is `no_std` + `alloc` so it can be used from code that runs
//! inside a global allocator or on targets without `std`.
//!
//! ## Key Types
//!
//! - [`MemoryCounters`] - allocator byte and object counters
//! - [`PauseHistory`] - recent collection pauses, newest first
//! - [`PauseQuantiles`] - tail-latency buckets over the recent pauses

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::time::Duration;

/// Number of recent pauses kept in a [`PauseHistory`].
///
/// Older pauses still count towards [`PauseHistory::count`] and
/// [`PauseHistory::total`], they are only dropped from the recent window.
pub const MAX_RECENT_PAUSES: usize = 256;

// ============================================================================
// Memory counters
// ============================================================================

/// Allocator counters taken at report time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryCounters {
    /// Bytes currently allocated and not yet freed
    pub allocated: u64,
    /// Bytes allocated since start, freed or not
    pub total_allocated: u64,
    /// Bytes obtained from the operating system
    pub system: u64,
    /// Number of allocations since start
    pub allocations: u64,
    /// Number of frees since start
    pub frees: u64,
}

impl MemoryCounters {
    /// Objects currently live on the heap
    #[must_use]
    pub fn live_objects(&self) -> u64 {
        self.allocations.saturating_sub(self.frees)
    }
}

// ============================================================================
// Pause history
// ============================================================================

/// Percentile buckets over a set of pauses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseQuantiles {
    pub p95: Duration,
    pub p98: Duration,
    pub p99: Duration,
}

impl PauseQuantiles {
    /// Compute nearest-rank percentiles. Order of `pauses` does not matter.
    ///
    /// An empty slice yields all-zero buckets.
    #[must_use]
    pub fn from_pauses(pauses: &[Duration]) -> Self {
        if pauses.is_empty() {
            return Self::default();
        }

        let mut sorted: Vec<Duration> = pauses.to_vec();
        sorted.sort_unstable();

        Self {
            p95: nearest_rank(&sorted, 95),
            p98: nearest_rank(&sorted, 98),
            p99: nearest_rank(&sorted, 99),
        }
    }
}

/// Nearest-rank percentile of a sorted, non-empty slice
fn nearest_rank(sorted: &[Duration], percent: usize) -> Duration {
    // rank = ceil(percent/100 * n), 1-based
    let rank = (sorted.len() * percent).div_ceil(100);
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}

/// Observed collection pauses
///
/// `recent` is ordered **newest first**: `recent[0]` is the last pause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PauseHistory {
    /// Most recent pauses, newest first, at most [`MAX_RECENT_PAUSES`]
    pub recent: Vec<Duration>,
    /// Number of pauses ever recorded
    pub count: u64,
    /// Sum of every pause ever recorded
    pub total: Duration,
    /// Percentile buckets over `recent`
    pub quantiles: PauseQuantiles,
}

impl PauseHistory {
    /// History with no collections observed
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a history where `recent` is every pause ever seen, newest first.
    ///
    /// `count` and `total` are derived from the slice.
    #[must_use]
    pub fn from_newest_first(recent: Vec<Duration>) -> Self {
        let count = recent.len() as u64;
        let total = recent.iter().sum();
        let quantiles = PauseQuantiles::from_pauses(&recent);
        Self { recent, count, total, quantiles }
    }

    /// Same as [`PauseHistory::from_newest_first`] for providers that collect
    /// pauses in chronological order.
    #[must_use]
    pub fn from_oldest_first(mut pauses: Vec<Duration>) -> Self {
        pauses.reverse();
        Self::from_newest_first(pauses)
    }

    /// True when at least one pause can be read from `recent`
    #[must_use]
    pub fn has_collections(&self) -> bool {
        self.count > 0 && !self.recent.is_empty()
    }

    /// The most recent pause, if any
    #[must_use]
    pub fn last(&self) -> Option<Duration> {
        if self.count == 0 {
            return None;
        }
        self.recent.first().copied()
    }

    /// Mean of `recent`, truncated to whole nanoseconds.
    ///
    /// Returns `None` when no pauses were recorded.
    #[must_use]
    pub fn average(&self) -> Option<Duration> {
        if !self.has_collections() {
            return None;
        }
        let sum: u128 = self.recent.iter().map(Duration::as_nanos).sum();
        let mean = sum / self.recent.len() as u128;
        Some(Duration::from_nanos(u64::try_from(mean).unwrap_or(u64::MAX)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_empty_history() {
        let history = PauseHistory::empty();
        assert!(!history.has_collections());
        assert_eq!(history.last(), None);
        assert_eq!(history.average(), None);
        assert_eq!(history.quantiles, PauseQuantiles::default());
    }

    #[test]
    fn test_newest_first_keeps_order() {
        let history = PauseHistory::from_newest_first(vec![ms(10), ms(20), ms(30)]);
        assert_eq!(history.count, 3);
        assert_eq!(history.total, ms(60));
        assert_eq!(history.last(), Some(ms(10)));
    }

    #[test]
    fn test_oldest_first_is_reversed() {
        let history = PauseHistory::from_oldest_first(vec![ms(10), ms(20), ms(30)]);
        assert_eq!(history.last(), Some(ms(30)));
        assert_eq!(history.recent, vec![ms(30), ms(20), ms(10)]);
    }

    #[test]
    fn test_average_truncates() {
        let history = PauseHistory::from_newest_first(vec![
            Duration::from_nanos(1),
            Duration::from_nanos(2),
        ]);
        // 3 / 2 = 1, not 1.5 rounded up
        assert_eq!(history.average(), Some(Duration::from_nanos(1)));
    }

    #[test]
    fn test_count_without_recent_is_not_readable() {
        let history = PauseHistory { count: 4, total: ms(40), ..PauseHistory::default() };
        assert!(!history.has_collections());
        assert_eq!(history.last(), None);
        assert_eq!(history.average(), None);
    }

    #[test]
    fn test_quantiles_nearest_rank() {
        let pauses: Vec<Duration> = (1..=100).map(ms).collect();
        let q = PauseQuantiles::from_pauses(&pauses);
        assert_eq!(q.p95, ms(95));
        assert_eq!(q.p98, ms(98));
        assert_eq!(q.p99, ms(99));
    }

    #[test]
    fn test_quantiles_small_sample() {
        let q = PauseQuantiles::from_pauses(&[ms(30), ms(10), ms(20)]);
        assert_eq!(q.p95, ms(30));
        assert_eq!(q.p99, ms(30));
    }

    #[test]
    fn test_live_objects_saturates() {
        let counters = MemoryCounters { allocations: 3, frees: 5, ..MemoryCounters::default() };
        assert_eq!(counters.live_objects(), 0);
    }
}
