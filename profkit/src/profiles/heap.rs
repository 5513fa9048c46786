//! Heap and allocation counter dumps

use std::io::Write;

use profkit_common::MemoryCounters;

use crate::domain::{PrintMode, ProfileError};
use crate::gc::format_bytes;

fn bytes_line(name: &str, value: u64, mode: PrintMode) -> String {
    if mode.is_detailed() {
        format!("# {name} = {value} ({})\n", format_bytes(value))
    } else {
        format!("# {name} = {value}\n")
    }
}

fn count_line(name: &str, value: u64) -> String {
    format!("# {name} = {value}\n")
}

/// Live heap: bytes and objects still allocated
///
/// # Errors
/// Returns [`ProfileError::SinkWrite`] if the sink rejects the output
pub fn write_heap<W: Write + ?Sized>(
    counters: &MemoryCounters,
    mode: PrintMode,
    w: &mut W,
) -> Result<(), ProfileError> {
    let mut out = String::from("heap profile\n");
    out.push_str(&bytes_line("Alloc", counters.allocated, mode));
    out.push_str(&count_line("HeapObjects", counters.live_objects()));
    out.push_str(&bytes_line("Sys", counters.system, mode));
    w.write_all(out.as_bytes()).map_err(ProfileError::sink)
}

/// Cumulative allocations since start
///
/// # Errors
/// Returns [`ProfileError::SinkWrite`] if the sink rejects the output
pub fn write_allocs<W: Write + ?Sized>(
    counters: &MemoryCounters,
    mode: PrintMode,
    w: &mut W,
) -> Result<(), ProfileError> {
    let mut out = String::from("allocs profile\n");
    out.push_str(&bytes_line("TotalAlloc", counters.total_allocated, mode));
    out.push_str(&count_line("Mallocs", counters.allocations));
    out.push_str(&count_line("Frees", counters.frees));
    w.write_all(out.as_bytes()).map_err(ProfileError::sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTERS: MemoryCounters = MemoryCounters {
        allocated: 2048,
        total_allocated: 10_240,
        system: 1_048_576,
        allocations: 12,
        frees: 9,
    };

    #[test]
    fn test_heap_normal() {
        let mut out = Vec::new();
        write_heap(&COUNTERS, PrintMode::Normal, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "heap profile\n# Alloc = 2048\n# HeapObjects = 3\n# Sys = 1048576\n"
        );
    }

    #[test]
    fn test_heap_detailed_adds_human_values() {
        let mut out = Vec::new();
        write_heap(&COUNTERS, PrintMode::Detailed, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("# Alloc = 2048 (2.00K)"));
        assert!(text.contains("# Sys = 1048576 (1.00M)"));
    }

    #[test]
    fn test_allocs() {
        let mut out = Vec::new();
        write_allocs(&COUNTERS, PrintMode::Normal, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "allocs profile\n# TotalAlloc = 10240\n# Mallocs = 12\n# Frees = 9\n"
        );
    }
}
