//! Process memory and thread counts from `/proc/self/status`

use std::fs;

use crate::domain::ProfileError;

pub const STATUS_PATH: &str = "/proc/self/status";

/// Fields of `/proc/<pid>/status` used by the profiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcStatus {
    /// Resident set size in bytes (`VmRSS`)
    pub resident_bytes: u64,
    /// Number of OS threads (`Threads`)
    pub threads: u64,
}

impl ProcStatus {
    /// Read the current process's status file
    ///
    /// # Errors
    /// Returns [`ProfileError::ProcRead`] if the file cannot be read.
    pub fn read_self() -> Result<Self, ProfileError> {
        let content = fs::read_to_string(STATUS_PATH)
            .map_err(|source| ProfileError::ProcRead { path: STATUS_PATH.to_string(), source })?;
        Ok(Self::parse(&content))
    }

    /// Parse a status file. Missing or malformed fields stay zero.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut status = Self::default();

        for line in content.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            match key {
                // "VmRSS:     1234 kB"
                "VmRSS" => status.resident_bytes = parse_kb(value).unwrap_or(0),
                "Threads" => status.threads = value.trim().parse().unwrap_or(0),
                _ => {}
            }
        }

        status
    }
}

fn parse_kb(value: &str) -> Option<u64> {
    let mut parts = value.split_whitespace();
    let amount: u64 = parts.next()?.parse().ok()?;
    match parts.next() {
        Some("kB") | None => Some(amount * 1024),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Name:\tprofkit
State:\tS (sleeping)
VmPeak:\t   12000 kB
VmRSS:\t    2048 kB
Threads:\t3
";

    #[test]
    fn test_parse_status() {
        let status = ProcStatus::parse(SAMPLE);
        assert_eq!(status.resident_bytes, 2048 * 1024);
        assert_eq!(status.threads, 3);
    }

    #[test]
    fn test_parse_missing_fields() {
        let status = ProcStatus::parse("Name:\tkthread\n");
        assert_eq!(status, ProcStatus::default());
    }

    #[test]
    fn test_parse_unknown_unit() {
        assert_eq!(parse_kb("  12 MB"), None);
        assert_eq!(parse_kb("12"), Some(12 * 1024));
    }

    #[test]
    fn test_read_self() {
        let result = ProcStatus::read_self();

        #[cfg(target_os = "linux")]
        {
            let status = result.expect("Failed to read /proc/self/status");
            assert!(status.threads >= 1);
            assert!(status.resident_bytes > 0);
        }

        #[cfg(not(target_os = "linux"))]
        {
            assert!(result.is_err());
        }
    }
}
