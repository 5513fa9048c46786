//! Domain model for profkit
//!
//! This module contains core domain types and errors that provide:
//! - Compile-time safety via newtype pattern
//! - Explicit configuration values instead of process-wide settings
//! - Structured error handling

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{PrintMode, Tid};

pub use errors::{ProfileError, ReportError};
