//! Arena demo: a toy collector reporting its pauses to profkit
//!
//! Allocates batches of buffers into an arena and "collects" it every few
//! batches. Each collection is timed as a pause, then the GC line, heap and
//! allocs profiles are printed.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --example arena-demo
//! cargo run --release --example arena-demo -- --serve   # keep serving on :7777
//! ```

use std::io;
use std::sync::Arc;

use profkit::domain::PrintMode;
use profkit::profiles::Profiler;
use profkit::provider::{CountingAllocator, PauseRecorder, RuntimeProvider};
use profkit::web::{self, AppState, DEFAULT_PORT};

#[global_allocator]
static ALLOCATOR: CountingAllocator = CountingAllocator::new();

struct Arena {
    buffers: Vec<Vec<u8>>,
}

impl Arena {
    fn allocate(&mut self, size: usize) {
        self.buffers.push(vec![0xAB; size]);
    }

    /// Free everything but the newest buffer
    fn collect(&mut self) {
        let keep = self.buffers.pop();
        self.buffers.clear();
        self.buffers.extend(keep);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let provider = RuntimeProvider::new(&ALLOCATOR, Arc::new(PauseRecorder::new()));
    let profiler = Profiler::new(provider, PrintMode::Detailed);
    let pauses = Arc::clone(profiler.provider().pauses());

    let mut arena = Arena { buffers: Vec::new() };
    for batch in 0..200 {
        for i in 0..64 {
            arena.allocate(1024 * (1 + (batch + i) % 16));
        }
        if batch % 10 == 9 {
            pauses.time(|| arena.collect());
        }
    }

    let mut stdout = io::stdout();
    profiler.gc(&mut stdout)?;
    profiler.heap(&mut stdout)?;
    profiler.allocs(&mut stdout)?;

    if std::env::args().any(|a| a == "--serve") {
        println!("serving on http://localhost:{DEFAULT_PORT}");
        let state = AppState { profiler, output_folder: "./generated".into(), port: DEFAULT_PORT };
        tokio::runtime::Runtime::new()?.block_on(web::serve(state))?;
    }

    Ok(())
}
