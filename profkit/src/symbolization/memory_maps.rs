//! Memory mapping utilities for process address space analysis
//!
//! Parses `/proc/<pid>/maps` to find where an executable is loaded, which is
//! needed to turn runtime addresses of a position-independent executable back
//! into the addresses recorded in its debug info.

use anyhow::{Context, Result};
use log::debug;
use std::fs;

/// Memory range of a loaded binary in a process's address space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRange {
    pub start: u64,
    pub end: u64,
}

impl MemoryRange {
    /// Check if an address falls within this memory range
    #[must_use]
    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.start && addr < self.end
    }
}

/// Find the memory range of `binary_path` in the maps of process `pid`
///
/// # Errors
/// Returns an error if `/proc/<pid>/maps` cannot be read or the binary is not mapped
pub fn parse_memory_maps(pid: u32, binary_path: &str) -> Result<MemoryRange> {
    let maps_path = format!("/proc/{pid}/maps");
    let maps = fs::read_to_string(&maps_path).with_context(|| format!("Failed to read {maps_path}"))?;
    find_range(&maps, binary_path)
}

/// Memory range of the running executable
///
/// # Errors
/// Returns an error if the executable path or the maps file is unavailable
pub fn self_memory_range() -> Result<MemoryRange> {
    let exe = std::env::current_exe().context("Failed to locate current executable")?;
    let exe_path = exe.to_str().context("Executable path is not valid UTF-8")?;
    parse_memory_maps(std::process::id(), exe_path)
}

/// Union of every mapping whose pathname is `binary_path`
fn find_range(maps: &str, binary_path: &str) -> Result<MemoryRange> {
    let mut range: Option<MemoryRange> = None;

    // "start-end perms offset dev inode pathname"
    for line in maps.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 6 || parts[5] != binary_path {
            continue;
        }
        let Some((start, end)) = parts[0].split_once('-') else {
            continue;
        };
        let start = u64::from_str_radix(start, 16).context("Failed to parse range start")?;
        let end = u64::from_str_radix(end, 16).context("Failed to parse range end")?;

        range = Some(match range {
            Some(r) => MemoryRange { start: r.start.min(start), end: r.end.max(end) },
            None => MemoryRange { start, end },
        });
    }

    let range = range.with_context(|| format!("Could not find memory range for {binary_path}"))?;
    debug!(
        "Executable memory range: 0x{:x} - 0x{:x} (size: {} KB)",
        range.start,
        range.end,
        (range.end - range.start) / 1024
    );
    Ok(range)
}
