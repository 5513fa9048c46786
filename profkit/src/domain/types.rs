//! Domain types providing compile-time safety and self-documentation

use std::fmt;

/// Thread ID
///
/// Represents a kernel thread ID inside the current process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tid(pub u32);

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TID:{}", self.0)
    }
}

/// How much detail text profiles include
///
/// Owned by each [`Profiler`](crate::profiles::Profiler) instance; there is
/// no process-wide default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrintMode {
    /// Aggregated, one line per group
    #[default]
    Normal,
    /// One line per item, with raw and human-readable values
    Detailed,
}

impl PrintMode {
    #[must_use]
    pub fn is_detailed(self) -> bool {
        self == PrintMode::Detailed
    }
}

impl From<bool> for PrintMode {
    fn from(detailed: bool) -> Self {
        if detailed {
            PrintMode::Detailed
        } else {
            PrintMode::Normal
        }
    }
}

impl fmt::Display for PrintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintMode::Normal => write!(f, "normal"),
            PrintMode::Detailed => write!(f, "detailed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tid_display() {
        assert_eq!(Tid(4242).to_string(), "TID:4242");
    }

    #[test]
    fn test_print_mode_from_flag() {
        assert_eq!(PrintMode::from(false), PrintMode::Normal);
        assert_eq!(PrintMode::from(true), PrintMode::Detailed);
        assert!(PrintMode::Detailed.is_detailed());
        assert_eq!(PrintMode::default().to_string(), "normal");
    }
}
