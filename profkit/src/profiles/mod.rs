//! Text profiles of the running process
//!
//! A [`Profiler`] is an explicitly constructed, caller-owned instance holding
//! the print mode, the diagnostics provider and the observation baseline.
//! Every profile is written to an arbitrary [`Write`] sink: a file, a buffer
//! or an HTTP response body.

pub mod heap;
pub mod symbol;
pub mod threads;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::domain::{PrintMode, ProfileError};
use crate::gc::{self, ReportBaseline};
use crate::provider::{DiagnosticsProvider, ProcStatus};

pub use threads::{list_threads, ThreadInfo};

/// Profiles that need no input besides the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    Threads,
    ThreadCreate,
    Heap,
    Allocs,
    Gc,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 5] = [
        ProfileKind::Threads,
        ProfileKind::ThreadCreate,
        ProfileKind::Heap,
        ProfileKind::Allocs,
        ProfileKind::Gc,
    ];

    /// Name used for file names and the CLI
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ProfileKind::Threads => "threads",
            ProfileKind::ThreadCreate => "thread-create",
            ProfileKind::Heap => "heap",
            ProfileKind::Allocs => "allocs",
            ProfileKind::Gc => "gc",
        }
    }

    /// Path segment under `/debug/`
    #[must_use]
    pub fn route(self) -> &'static str {
        match self {
            ProfileKind::ThreadCreate => "threadcreate",
            kind => kind.name(),
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProfileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s || kind.route() == s)
            .ok_or_else(|| format!("unknown profile: {s}"))
    }
}

/// Profiles for one process, with its own print mode and baseline
pub struct Profiler<P> {
    mode: PrintMode,
    provider: P,
    baseline: ReportBaseline,
}

impl<P: DiagnosticsProvider> Profiler<P> {
    /// Observation starts when the profiler is created
    pub fn new(provider: P, mode: PrintMode) -> Self {
        Self { mode, provider, baseline: ReportBaseline::now() }
    }

    #[must_use]
    pub fn with_baseline(mut self, baseline: ReportBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn mode(&self) -> PrintMode {
        self.mode
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Write the profile named by `kind`
    ///
    /// # Errors
    /// See the individual profile methods
    pub fn write<W: Write + ?Sized>(&self, kind: ProfileKind, w: &mut W) -> Result<(), ProfileError> {
        match kind {
            ProfileKind::Threads => self.threads(w),
            ProfileKind::ThreadCreate => self.thread_create(w),
            ProfileKind::Heap => self.heap(w),
            ProfileKind::Allocs => self.allocs(w),
            ProfileKind::Gc => self.gc(w),
        }
    }

    /// Thread dump
    ///
    /// # Errors
    /// Fails if `/proc/self/task` is unreadable or the sink rejects the output
    pub fn threads<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), ProfileError> {
        let threads = list_threads()?;
        threads::write_threads(&threads, self.mode, w)
    }

    /// Number of OS threads created and still alive
    ///
    /// # Errors
    /// Fails if `/proc/self/status` is unreadable or the sink rejects the output
    pub fn thread_create<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), ProfileError> {
        let status = ProcStatus::read_self()?;
        writeln!(w, "threadcreate profile: total {}", status.threads).map_err(ProfileError::sink)
    }

    /// Live heap counters
    ///
    /// # Errors
    /// Fails if the sink rejects the output
    pub fn heap<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), ProfileError> {
        heap::write_heap(&self.provider.memory_counters(), self.mode, w)
    }

    /// Cumulative allocation counters
    ///
    /// # Errors
    /// Fails if the sink rejects the output
    pub fn allocs<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), ProfileError> {
        heap::write_allocs(&self.provider.memory_counters(), self.mode, w)
    }

    /// One-line GC statistics since the baseline
    ///
    /// # Errors
    /// Returns [`ProfileError::Report`] if the sink rejects the line
    pub fn gc<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), ProfileError> {
        let counters = self.provider.memory_counters();
        let history = self.provider.pause_history();
        gc::report(&self.baseline, &counters, &history, w)?;
        Ok(())
    }

    /// Resolve addresses of this process to function names
    ///
    /// # Errors
    /// Fails if the executable's debug info is unusable or the sink rejects the output
    pub fn symbol<W: Write + ?Sized>(&self, words: &[String], w: &mut W) -> Result<(), ProfileError> {
        symbol::write_self_symbols(words, self.mode, w)
    }
}
