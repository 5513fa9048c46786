//! Garbage collection statistics
//!
//! Turns a [`MemoryCounters`](profkit_common::MemoryCounters) snapshot and a
//! [`PauseHistory`](profkit_common::PauseHistory) into one human-readable line:
//!
//! ```text
//! NumGC:3 Pause:10.00ms Pause(Avg):20.00ms Overhead:6.00% Alloc:2.00K Sys:1.00M Alloc(Rate):3.00M/s Pause(p95):30.00ms Pause(p98):30.00ms Pause(p99):30.00ms
//! ```
//!
//! Before the first collection only the memory fields are printed.

pub mod format;
pub mod reporter;

pub use format::{format_bytes, format_duration};
pub use reporter::{render_line, report, GcSummary, PauseSummary, ReportBaseline, MIN_ELAPSED};
