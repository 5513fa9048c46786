use profkit::domain::{PrintMode, ProfileError};
use profkit::gc::ReportBaseline;
use profkit::profiles::Profiler;
use profkit::provider::DiagnosticsProvider;
use profkit_common::{MemoryCounters, PauseHistory};
use std::io::{self, Write};
use std::time::Duration;

/// Provider returning the same fabricated snapshot on every call
struct FixedProvider {
    counters: MemoryCounters,
    history: PauseHistory,
}

impl DiagnosticsProvider for FixedProvider {
    fn memory_counters(&self) -> MemoryCounters {
        self.counters
    }

    fn pause_history(&self) -> PauseHistory {
        self.history.clone()
    }
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn scenario_profiler() -> Profiler<FixedProvider> {
    let counters = MemoryCounters {
        allocated: 2048,
        total_allocated: 4096,
        system: 1_048_576,
        ..MemoryCounters::default()
    };
    let history = PauseHistory::from_newest_first(vec![ms(10), ms(20), ms(30)]);

    Profiler::new(FixedProvider { counters, history }, PrintMode::Normal)
        .with_baseline(ReportBaseline::started_ago(Duration::from_secs(1)))
}

#[test]
fn test_end_to_end_gc_line() {
    let mut sink = Vec::new();
    scenario_profiler().gc(&mut sink).expect("gc report");

    let line = String::from_utf8(sink).expect("utf-8");
    assert!(line.ends_with('\n'));

    let fields: Vec<&str> = line.split_whitespace().collect();
    assert!(fields.contains(&"NumGC:3"), "{line}");
    assert!(fields.contains(&"Alloc:2.00K"), "{line}");
    assert!(fields.contains(&"Sys:1.00M"), "{line}");
    assert!(fields.contains(&"Pause(Avg):20.00ms"), "{line}");
    // Most recent pause is the first one in the history
    assert!(fields.contains(&"Pause:10.00ms"), "{line}");
    assert!(fields.contains(&"Pause(p99):30.00ms"), "{line}");
}

#[test]
fn test_no_collections_line() {
    let profiler = Profiler::new(
        FixedProvider {
            counters: MemoryCounters { allocated: 100, system: 2048, ..MemoryCounters::default() },
            history: PauseHistory::empty(),
        },
        PrintMode::Normal,
    );

    let mut sink = Vec::new();
    profiler.gc(&mut sink).expect("gc report");

    let line = String::from_utf8(sink).expect("utf-8");
    assert!(line.starts_with("Alloc:100B Sys:2.00K Alloc(Rate):0B/s"), "{line}");
    assert!(!line.contains("NumGC"));
}

struct FullSink;

impl Write for FullSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_failure_is_reported() {
    let err = scenario_profiler().gc(&mut FullSink).unwrap_err();
    assert!(err.is_sink_failure());
    assert!(matches!(err, ProfileError::Report(_)));
}
