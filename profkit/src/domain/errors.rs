//! Structured error types for profkit
//!
//! Using thiserror for automatic Display implementation and error chaining.

use thiserror::Error;

/// Failure of the GC statistics reporter
///
/// The computation itself cannot fail; only the write to the sink can.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("sink write failed: {0}")]
    SinkWrite(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("sink write failed: {0}")]
    SinkWrite(#[source] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    ProcRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Symbol resolution failed: {0}")]
    SymbolizationFailed(String),
}

impl ProfileError {
    /// Convert a write error on the profile sink
    pub(crate) fn sink(err: std::io::Error) -> Self {
        ProfileError::SinkWrite(err)
    }

    /// True if the profile could not be delivered to its sink
    #[must_use]
    pub fn is_sink_failure(&self) -> bool {
        matches!(self, ProfileError::SinkWrite(_) | ProfileError::Report(ReportError::SinkWrite(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_sink_write_display() {
        let err = ReportError::SinkWrite(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(err.to_string(), "sink write failed: closed");
    }

    #[test]
    fn test_proc_read_display() {
        let err = ProfileError::ProcRead {
            path: "/proc/self/status".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/proc/self/status"));
        assert!(!err.is_sink_failure());
    }

    #[test]
    fn test_report_error_is_sink_failure() {
        let err: ProfileError =
            ReportError::SinkWrite(io::Error::new(io::ErrorKind::Other, "full")).into();
        assert!(err.is_sink_failure());
    }
}
