// String formatting intentionally uses format! for clarity
#![allow(clippy::format_push_string)]

use addr2line::Context;
use anyhow::{Context as _, Result};
use gimli::{EndianRcSlice, RunTimeEndian};
use object::{Object, ObjectKind, ObjectSection};
use rustc_demangle::demangle;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use super::memory_maps::{self_memory_range, MemoryRange};

pub const UNKNOWN_FUNCTION: &str = "<unknown>";

/// Symbolizer for resolving instruction pointers to source locations
///
/// Includes a cache to avoid re-resolving the same addresses repeatedly.
pub struct Symbolizer {
    ctx: Context<EndianRcSlice<RunTimeEndian>>,
    /// Position-independent executables need their load address subtracted
    is_pie: bool,
    /// Load range of the binary, when symbolizing a running process
    range: Option<MemoryRange>,
    /// Cache of resolved frames by address
    cache: RefCell<HashMap<u64, ResolvedFrame>>,
}

impl Symbolizer {
    /// Create a new symbolizer for the given binary
    ///
    /// Addresses passed to [`Symbolizer::resolve`] are treated as addresses
    /// in the binary's debug info.
    ///
    /// # Errors
    /// Returns an error if the binary file cannot be read or parsed, or if DWARF debug info is missing
    pub fn new<P: AsRef<Path>>(binary_path: P) -> Result<Self> {
        let binary_data = fs::read(binary_path.as_ref()).context("Failed to read binary file")?;

        let obj_file = object::File::parse(&*binary_data).context("Failed to parse object file")?;
        let is_pie = obj_file.kind() == ObjectKind::Dynamic;

        // Load DWARF debug info
        let endian =
            if obj_file.is_little_endian() { RunTimeEndian::Little } else { RunTimeEndian::Big };

        let load_section =
            |id: gimli::SectionId| -> Result<EndianRcSlice<RunTimeEndian>, gimli::Error> {
                let data = obj_file
                    .section_by_name(id.name())
                    .and_then(|section| section.uncompressed_data().ok())
                    .unwrap_or(std::borrow::Cow::Borrowed(&[][..]));
                Ok(EndianRcSlice::new(Rc::from(&*data), endian))
            };

        let dwarf = gimli::Dwarf::load(&load_section)?;
        let ctx = Context::from_dwarf(dwarf).context("Failed to load DWARF debug information")?;

        Ok(Self { ctx, is_pie, range: None, cache: RefCell::new(HashMap::new()) })
    }

    /// Symbolizer for the running executable
    ///
    /// Addresses passed to [`Symbolizer::resolve_runtime`] are live addresses
    /// of this process, e.g. a function pointer cast to an integer.
    ///
    /// # Errors
    /// Returns an error if the executable cannot be located, read or mapped
    pub fn for_current_exe() -> Result<Self> {
        let exe = std::env::current_exe().context("Failed to locate current executable")?;
        let mut symbolizer = Self::new(&exe)?;
        symbolizer.range = Some(self_memory_range()?);
        Ok(symbolizer)
    }

    /// Translate a runtime address to a debug-info address
    #[must_use]
    pub fn to_file_address(&self, runtime_addr: u64) -> Option<u64> {
        match self.range {
            Some(range) if range.contains(runtime_addr) => {
                Some(if self.is_pie { runtime_addr - range.start } else { runtime_addr })
            }
            Some(_) => None,
            None => Some(runtime_addr),
        }
    }

    /// Resolve a live address of this process
    ///
    /// Returns `None` for addresses outside the executable (shared libraries,
    /// heap, garbage input).
    #[must_use]
    pub fn resolve_runtime(&self, runtime_addr: u64) -> Option<ResolvedFrame> {
        let file_addr = self.to_file_address(runtime_addr)?;
        let mut resolved = self.resolve(file_addr);
        resolved.addr = runtime_addr;
        Some(resolved)
    }

    /// Resolve an instruction pointer to source location information
    ///
    /// Uses a cache to avoid re-resolving the same address multiple times.
    pub fn resolve(&self, addr: u64) -> ResolvedFrame {
        if let Some(cached) = self.cache.borrow().get(&addr) {
            return cached.clone();
        }

        let mut result = Vec::new();

        if let Ok(mut frame_iter) = self.ctx.find_frames(addr).skip_all_loads() {
            while let Ok(Some(frame)) = frame_iter.next() {
                let function = frame
                    .function
                    .and_then(|f| f.raw_name().ok().map(|s| Self::demangle_symbol(&s)))
                    .unwrap_or_else(|| UNKNOWN_FUNCTION.to_string());

                let location = frame.location.map(|loc| SourceLocation {
                    file: loc.file.map(std::string::ToString::to_string),
                    line: loc.line,
                    column: loc.column,
                });

                result.push(InlinedFrame { function, location });
            }
        }

        let resolved = ResolvedFrame {
            addr,
            frames: if result.is_empty() {
                vec![InlinedFrame { function: UNKNOWN_FUNCTION.to_string(), location: None }]
            } else {
                result
            },
        };

        self.cache.borrow_mut().insert(addr, resolved.clone());

        resolved
    }

    /// Demangle a Rust symbol name, without the trailing hash
    #[must_use]
    pub fn demangle_symbol(symbol: &str) -> String {
        format!("{:#}", demangle(symbol))
    }
}

/// A resolved stack frame (may contain multiple inlined frames)
#[derive(Debug, Clone)]
pub struct ResolvedFrame {
    pub addr: u64,
    pub frames: Vec<InlinedFrame>,
}

/// An inlined frame within a resolved frame
#[derive(Debug, Clone)]
pub struct InlinedFrame {
    pub function: String,
    pub location: Option<SourceLocation>,
}

/// Source code location
#[derive(Debug, Clone)]
pub struct SourceLocation {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl ResolvedFrame {
    /// Outermost function name, `None` when nothing was found
    ///
    /// Inlined frames come innermost first, so the last frame is the function
    /// that actually contains the address.
    #[must_use]
    pub fn function(&self) -> Option<&str> {
        self.frames
            .last()
            .map(|f| f.function.as_str())
            .filter(|name| *name != UNKNOWN_FUNCTION)
    }

    /// Format the frame for display
    #[must_use]
    pub fn format(&self, frame_num: usize) -> String {
        let mut output = String::new();

        for (idx, inlined) in self.frames.iter().enumerate() {
            let prefix = if idx == 0 { format!("#{frame_num:<2}") } else { "    ".to_string() };

            output.push_str(&format!("{} 0x{:016x} {}", prefix, self.addr, inlined.function));

            if let Some(ref loc) = inlined.location {
                if let Some(ref file) = loc.file {
                    output.push_str(&format!("\n                      at {file}"));
                    if let Some(line) = loc.line {
                        output.push_str(&format!(":{line}"));
                    }
                }
            }

            if idx < self.frames.len() - 1 {
                output.push('\n');
            }
        }

        output
    }
}
