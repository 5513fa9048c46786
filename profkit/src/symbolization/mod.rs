//! # Symbol Resolution
//!
//! Converts raw addresses into function names using the DWARF debug
//! information of the running executable.
//!
//! Modern Linux executables are position-independent: the loader places them
//! at a random base address, while DWARF records addresses relative to the
//! file. The runtime base comes from `/proc/self/maps`:
//!
//! ```text
//! File Address = Runtime Address - Base Address
//! ```
//!
//! **Libraries used**:
//! - `gimli`: Low-level DWARF parser
//! - `addr2line`: High-level symbolization library built on gimli
//! - `object`: ELF binary parser
//! - `rustc-demangle`: Rust symbol demangling
//!
//! Release builds need `debug = true` in their profile for names to resolve.

pub mod memory_maps;
pub mod symbolizer;

pub use memory_maps::{parse_memory_maps, self_memory_range, MemoryRange};
pub use symbolizer::{ResolvedFrame, Symbolizer};
