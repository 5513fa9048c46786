//! Diagnostics providers
//!
//! The reporting side never reads process state directly. It asks a
//! [`DiagnosticsProvider`] for immutable snapshots:
//!
//! - [`RuntimeProvider`] binds to the live process: a [`CountingAllocator`]
//!   installed as the global allocator, a [`PauseRecorder`] fed by the host,
//!   and `/proc/self/status` for the resident set size.
//! - Tests implement the trait with fixed, fabricated snapshots.

pub mod allocator;
pub mod pauses;
pub mod proc_status;

use std::sync::Arc;

use log::warn;
use profkit_common::{MemoryCounters, PauseHistory};

pub use allocator::CountingAllocator;
pub use pauses::PauseRecorder;
pub use proc_status::ProcStatus;

/// Source of memory and pause snapshots
pub trait DiagnosticsProvider {
    /// Current allocator counters
    fn memory_counters(&self) -> MemoryCounters;

    /// Pause history, newest first
    fn pause_history(&self) -> PauseHistory;
}

impl<P: DiagnosticsProvider + ?Sized> DiagnosticsProvider for Arc<P> {
    fn memory_counters(&self) -> MemoryCounters {
        (**self).memory_counters()
    }

    fn pause_history(&self) -> PauseHistory {
        (**self).pause_history()
    }
}

/// Provider bound to the running process
#[derive(Clone)]
pub struct RuntimeProvider {
    allocator: &'static CountingAllocator,
    pauses: Arc<PauseRecorder>,
}

impl RuntimeProvider {
    #[must_use]
    pub fn new(allocator: &'static CountingAllocator, pauses: Arc<PauseRecorder>) -> Self {
        Self { allocator, pauses }
    }

    /// Recorder the host should report pauses to
    #[must_use]
    pub fn pauses(&self) -> &Arc<PauseRecorder> {
        &self.pauses
    }
}

impl DiagnosticsProvider for RuntimeProvider {
    fn memory_counters(&self) -> MemoryCounters {
        let mut counters = self.allocator.counters();
        counters.system = match ProcStatus::read_self() {
            Ok(status) => status.resident_bytes,
            Err(e) => {
                warn!("{e}, reporting Sys as 0");
                0
            }
        };
        counters
    }

    fn pause_history(&self) -> PauseHistory {
        self.pauses.snapshot()
    }
}
