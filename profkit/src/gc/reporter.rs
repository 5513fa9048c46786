//! One-line garbage collection statistics

// Rates and percentages are display values
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::io::Write;
use std::time::{Duration, Instant};

use log::debug;
use profkit_common::{MemoryCounters, PauseHistory};

use super::format::{format_bytes, format_duration};
use crate::domain::ReportError;

/// Smallest elapsed time used as a divisor
///
/// A report taken in the same instant as its baseline would otherwise divide
/// by zero.
pub const MIN_ELAPSED: Duration = Duration::from_micros(1);

/// Start of the observation window
#[derive(Debug, Clone, Copy)]
pub struct ReportBaseline(Instant);

impl ReportBaseline {
    /// Observation starts now
    #[must_use]
    pub fn now() -> Self {
        Self(Instant::now())
    }

    /// Observation starts at `start`
    #[must_use]
    pub fn at(start: Instant) -> Self {
        Self(start)
    }

    /// Baseline placed `ago` before now, or now if the clock can't go back that far
    #[must_use]
    pub fn started_ago(ago: Duration) -> Self {
        let now = Instant::now();
        Self(now.checked_sub(ago).unwrap_or(now))
    }

    /// Time between the baseline and `now`, never below [`MIN_ELAPSED`]
    #[must_use]
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.0);
        if elapsed < MIN_ELAPSED {
            debug!("elapsed {elapsed:?} below minimum, clamping to {MIN_ELAPSED:?}");
            MIN_ELAPSED
        } else {
            elapsed
        }
    }
}

/// Pause-derived metrics, only present once a collection was observed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PauseSummary {
    pub count: u64,
    pub last: Duration,
    pub average: Duration,
    /// Share of elapsed time spent paused, in percent
    pub overhead_percent: f64,
    pub p95: Duration,
    pub p98: Duration,
    pub p99: Duration,
}

/// Derived metrics before formatting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GcSummary {
    pub elapsed: Duration,
    pub allocated: u64,
    pub system: u64,
    /// Bytes allocated per second of elapsed time
    pub alloc_rate: f64,
    pub pauses: Option<PauseSummary>,
}

impl GcSummary {
    /// Compute every metric for a report over `elapsed`
    #[must_use]
    pub fn compute(elapsed: Duration, counters: &MemoryCounters, history: &PauseHistory) -> Self {
        let elapsed = elapsed.max(MIN_ELAPSED);
        let alloc_rate = counters.total_allocated as f64 / elapsed.as_secs_f64();

        let pauses = match (history.last(), history.average()) {
            (Some(last), Some(average)) => Some(PauseSummary {
                count: history.count,
                last,
                average,
                overhead_percent: history.total.as_nanos() as f64 / elapsed.as_nanos() as f64
                    * 100.0,
                p95: history.quantiles.p95,
                p98: history.quantiles.p98,
                p99: history.quantiles.p99,
            }),
            _ => None,
        };

        Self {
            elapsed,
            allocated: counters.allocated,
            system: counters.system,
            alloc_rate,
            pauses,
        }
    }

    /// Render as a single line, including the trailing newline
    #[must_use]
    pub fn render(&self) -> String {
        let memory = format!(
            "Alloc:{} Sys:{} Alloc(Rate):{}/s",
            format_bytes(self.allocated),
            format_bytes(self.system),
            format_bytes(self.alloc_rate as u64),
        );

        match self.pauses {
            Some(p) => format!(
                "NumGC:{} Pause:{} Pause(Avg):{} Overhead:{:.2}% {} Pause(p95):{} Pause(p98):{} Pause(p99):{}\n",
                p.count,
                format_duration(p.last),
                format_duration(p.average),
                p.overhead_percent,
                memory,
                format_duration(p.p95),
                format_duration(p.p98),
                format_duration(p.p99),
            ),
            // No collection yet: skip everything that divides by the pause count
            None => format!("{memory}\n"),
        }
    }
}

/// Render a report over a known elapsed time
#[must_use]
pub fn render_line(elapsed: Duration, counters: &MemoryCounters, history: &PauseHistory) -> String {
    GcSummary::compute(elapsed, counters, history).render()
}

/// Write one GC statistics line for the window starting at `baseline`
///
/// # Errors
/// Returns [`ReportError::SinkWrite`] if the sink rejects the line.
pub fn report<W: Write + ?Sized>(
    baseline: &ReportBaseline,
    counters: &MemoryCounters,
    history: &PauseHistory,
    sink: &mut W,
) -> Result<(), ReportError> {
    let elapsed = baseline.elapsed_at(Instant::now());
    let line = render_line(elapsed, counters, history);
    sink.write_all(line.as_bytes()).map_err(ReportError::SinkWrite)
}
