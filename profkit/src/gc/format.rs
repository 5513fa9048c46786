//! Human-scaled formatting for byte counts and durations

// Display values are allowed to lose precision
#![allow(clippy::cast_precision_loss)]

use std::time::Duration;

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MIN: u128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MIN;

/// Format a byte count: `512B`, `2.00K`, `1.00M`, `3.50G`
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    if bytes < KIB {
        format!("{bytes}B")
    } else if bytes < MIB {
        format!("{:.2}K", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.2}M", bytes as f64 / MIB as f64)
    } else {
        format!("{:.2}G", bytes as f64 / GIB as f64)
    }
}

/// Format a duration in the largest unit that keeps it above one.
///
/// Zero is rendered as a bare `0`.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    let value = nanos as f64;

    if nanos < NANOS_PER_SEC {
        match nanos {
            0 => "0".to_string(),
            n if n < NANOS_PER_MICRO => format!("{value:.2}ns"),
            n if n < NANOS_PER_MILLI => format!("{:.2}us", value / NANOS_PER_MICRO as f64),
            _ => format!("{:.2}ms", value / NANOS_PER_MILLI as f64),
        }
    } else if nanos < NANOS_PER_MIN {
        format!("{:.2}s", value / NANOS_PER_SEC as f64)
    } else if nanos < NANOS_PER_HOUR {
        format!("{:.2}m", value / NANOS_PER_MIN as f64)
    } else {
        format!("{:.2}h", value / NANOS_PER_HOUR as f64)
    }
}
