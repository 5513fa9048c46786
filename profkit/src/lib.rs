//! # profkit - Text Profiles and GC Statistics for Rust Processes
//!
//! profkit exposes a small set of diagnostics about the process it runs in:
//! thread dumps, heap and allocation counters, symbol lookup, and a one-line
//! garbage collection summary. Profiles are plain text written to any
//! `std::io::Write` sink, so the same code feeds the CLI, report files and
//! HTTP responses.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        Host Process                           │
//! │   #[global_allocator] CountingAllocator   PauseRecorder       │
//! └───────────────┬───────────────────────────────┬───────────────┘
//!                 │ counters                      │ pauses
//!                 ▼                               ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │              DiagnosticsProvider (RuntimeProvider)            │
//! │        MemoryCounters snapshot      PauseHistory snapshot     │
//! └───────────────────────────────┬───────────────────────────────┘
//!                                 ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │                 Profiler (PrintMode, baseline)                │
//! │   threads  thread-create  heap  allocs  gc  symbol            │
//! └───────┬──────────────────────┬──────────────────────┬─────────┘
//!         ▼                      ▼                      ▼
//!   ┌───────────┐        ┌──────────────┐        ┌────────────┐
//!   │    CLI    │        │ report files │        │ HTTP (axum)│
//!   └───────────┘        └──────────────┘        └────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`gc`]: the GC statistics line (overhead, allocation rate, average and
//!   tail pauses) and the human-readable byte/duration formatting
//! - [`provider`]: the [`provider::DiagnosticsProvider`] trait, the counting
//!   allocator, the pause recorder and `/proc/self/status` parsing
//! - [`profiles`]: the caller-owned [`profiles::Profiler`] and every text profile
//! - [`symbolization`]: DWARF-based address to function name resolution
//! - [`report`]: writes every profile into `<name>-<pid>.text` files
//! - [`web`]: serves the profiles over HTTP
//! - [`cli`]: command-line argument parsing
//! - [`domain`]: core types and errors
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use profkit::domain::PrintMode;
//! use profkit::profiles::Profiler;
//! use profkit::provider::{CountingAllocator, PauseRecorder, RuntimeProvider};
//! use std::sync::Arc;
//!
//! #[global_allocator]
//! static ALLOCATOR: CountingAllocator = CountingAllocator::new();
//!
//! let pauses = Arc::new(PauseRecorder::new());
//! let profiler = Profiler::new(RuntimeProvider::new(&ALLOCATOR, pauses.clone()), PrintMode::Normal);
//!
//! pauses.time(|| arena.collect());
//! profiler.gc(&mut std::io::stdout())?;
//! ```

pub mod cli;
pub mod domain;
pub mod gc;
pub mod profiles;
pub mod provider;
pub mod report;
pub mod symbolization;
pub mod web;
