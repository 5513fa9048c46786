//! # profkit - Main Entry Point
//!
//! One-shot profiles (`gc`, `threads`, `heap`, ...) print to stdout,
//! `report` writes files, `serve` keeps the process alive behind HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io::{self, Write};
use std::sync::Arc;

use profkit::cli::{Args, Command};
use profkit::domain::PrintMode;
use profkit::profiles::{ProfileKind, Profiler};
use profkit::provider::{CountingAllocator, PauseRecorder, RuntimeProvider};
use profkit::report::write_report;
use profkit::web::{self, AppState};

#[global_allocator]
static ALLOCATOR: CountingAllocator = CountingAllocator::new();

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_NOPERM: i32 = 77;

// Usage errors exit with 2 from clap itself
fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::PermissionDenied)
    }) {
        EXIT_NOPERM
    } else {
        EXIT_ERROR
    }
}

/// Write a one-shot profile to stdout
fn print_profile(profiler: &Profiler<RuntimeProvider>, kind: ProfileKind) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    profiler.write(kind, &mut out).with_context(|| format!("{kind} profile failed"))?;
    out.flush().context("Failed to flush stdout")
}

fn run() -> Result<()> {
    let args = Args::parse();
    let mode = PrintMode::from(args.detailed);

    // The binary has no collector of its own: pauses stay empty unless a
    // host embedding the library records them
    let provider = RuntimeProvider::new(&ALLOCATOR, Arc::new(PauseRecorder::new()));
    let profiler = Profiler::new(provider, mode);

    match args.command {
        Command::Gc => print_profile(&profiler, ProfileKind::Gc),
        Command::Threads => print_profile(&profiler, ProfileKind::Threads),
        Command::ThreadCreate => print_profile(&profiler, ProfileKind::ThreadCreate),
        Command::Heap => print_profile(&profiler, ProfileKind::Heap),
        Command::Allocs => print_profile(&profiler, ProfileKind::Allocs),
        Command::Symbol { addrs } => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            profiler.symbol(&addrs, &mut out).context("symbol lookup failed")?;
            out.flush().context("Failed to flush stdout")
        }
        Command::Report { output } => {
            let written = write_report(&profiler, &output)?;
            if !args.quiet {
                for path in written {
                    println!("saved: {}", path.display());
                }
            }
            Ok(())
        }
        Command::Serve { port, output } => {
            if !args.quiet {
                println!("profkit v{}", env!("CARGO_PKG_VERSION"));
                println!("listening: http://localhost:{port}");
                println!("output: {}", output.display());
            }
            info!("print mode: {}", profiler.mode());
            let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
            runtime.block_on(web::serve(AppState { profiler, output_folder: output, port }))
        }
    }
}
