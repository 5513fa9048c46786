//! Collection pause recorder
//!
//! Rust has no runtime collector, so pauses come from whatever the host
//! application considers a stop-the-world phase (an arena sweep, a cache
//! purge). The host reports them here and the GC line picks them up.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use profkit_common::{PauseHistory, PauseQuantiles, MAX_RECENT_PAUSES};

#[derive(Default)]
struct Inner {
    /// Newest at the front
    recent: VecDeque<Duration>,
    count: u64,
    total: Duration,
}

/// Thread-safe pause log
#[derive(Default)]
pub struct PauseRecorder {
    inner: Mutex<Inner>,
}

impl PauseRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves the counters consistent
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one pause
    pub fn record(&self, pause: Duration) {
        let mut inner = self.lock();
        inner.recent.push_front(pause);
        inner.recent.truncate(MAX_RECENT_PAUSES);
        inner.count += 1;
        inner.total += pause;
    }

    /// Run `f` and record its wall-clock time as a pause
    pub fn time<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.record(start.elapsed());
        result
    }

    /// Snapshot the recorded pauses, newest first
    #[must_use]
    pub fn snapshot(&self) -> PauseHistory {
        let inner = self.lock();
        let recent: Vec<Duration> = inner.recent.iter().copied().collect();
        let quantiles = PauseQuantiles::from_pauses(&recent);
        PauseHistory { recent, count: inner.count, total: inner.total, quantiles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_recorder() {
        let history = PauseRecorder::new().snapshot();
        assert!(!history.has_collections());
        assert_eq!(history.count, 0);
    }

    #[test]
    fn test_newest_first() {
        let recorder = PauseRecorder::new();
        recorder.record(Duration::from_millis(1));
        recorder.record(Duration::from_millis(2));
        recorder.record(Duration::from_millis(3));

        let history = recorder.snapshot();
        assert_eq!(history.last(), Some(Duration::from_millis(3)));
        assert_eq!(history.count, 3);
        assert_eq!(history.total, Duration::from_millis(6));
    }

    #[test]
    fn test_window_is_bounded_but_totals_are_not() {
        let recorder = PauseRecorder::new();
        for _ in 0..MAX_RECENT_PAUSES + 10 {
            recorder.record(Duration::from_micros(5));
        }

        let history = recorder.snapshot();
        assert_eq!(history.recent.len(), MAX_RECENT_PAUSES);
        assert_eq!(history.count, (MAX_RECENT_PAUSES + 10) as u64);
        assert_eq!(history.total, Duration::from_micros(5) * (MAX_RECENT_PAUSES as u32 + 10));
    }

    #[test]
    fn test_time_records_closure() {
        let recorder = PauseRecorder::new();
        let value = recorder.time(|| 42);
        assert_eq!(value, 42);
        assert_eq!(recorder.snapshot().count, 1);
    }

    #[test]
    fn test_concurrent_records() {
        let recorder = Arc::new(PauseRecorder::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let recorder = Arc::clone(&recorder);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        recorder.record(Duration::from_nanos(10));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(recorder.snapshot().count, 400);
    }
}
