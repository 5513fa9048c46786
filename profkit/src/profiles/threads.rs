//! Thread dump of the current process
//!
//! Reads `/proc/<pid>/task/*/{comm,stat}`. Normal mode groups threads by name,
//! detailed mode prints one line per thread.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;

use crate::domain::{PrintMode, ProfileError, Tid};

const SELF_TASK_DIR: &str = "/proc/self/task";

/// One OS thread of the process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadInfo {
    pub tid: Tid,
    pub name: String,
    /// Scheduler state letter from `stat` (`R`, `S`, `D`, ...)
    pub state: char,
}

/// List the threads of the running process
///
/// # Errors
/// Returns [`ProfileError::ProcRead`] if the task directory cannot be read
pub fn list_threads() -> Result<Vec<ThreadInfo>, ProfileError> {
    list_threads_in(SELF_TASK_DIR)
}

/// List the threads found under a `/proc/<pid>/task` directory
///
/// Threads that exit while the directory is scanned are skipped.
///
/// # Errors
/// Returns [`ProfileError::ProcRead`] if the task directory cannot be read
pub fn list_threads_in(task_dir: &str) -> Result<Vec<ThreadInfo>, ProfileError> {
    let entries = fs::read_dir(task_dir)
        .map_err(|source| ProfileError::ProcRead { path: task_dir.to_string(), source })?;

    let mut threads: Vec<ThreadInfo> = entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let tid = entry.file_name().to_string_lossy().parse::<u32>().ok()?;

            let comm = fs::read_to_string(format!("{task_dir}/{tid}/comm")).ok()?;
            let stat = fs::read_to_string(format!("{task_dir}/{tid}/stat")).unwrap_or_default();

            Some(ThreadInfo {
                tid: Tid(tid),
                name: comm.trim().to_string(),
                state: parse_state(&stat).unwrap_or('?'),
            })
        })
        .collect();

    threads.sort_by_key(|t| t.tid);
    Ok(threads)
}

/// Extract the state letter from a `stat` line: "tid (comm) S ..."
///
/// The command name may itself contain parentheses, so split on the last one.
fn parse_state(stat_line: &str) -> Option<char> {
    let close = stat_line.rfind(')')?;
    stat_line[close + 1..].trim_start().chars().next()
}

fn describe_state(state: char) -> &'static str {
    match state {
        'R' => "running",
        'S' => "sleeping",
        'D' => "disk sleep",
        'T' => "stopped",
        't' => "tracing stop",
        'Z' => "zombie",
        'X' => "dead",
        'I' => "idle",
        _ => "unknown",
    }
}

/// Write a thread dump
///
/// # Errors
/// Returns [`ProfileError::SinkWrite`] if the sink rejects the output
pub fn write_threads<W: Write + ?Sized>(
    threads: &[ThreadInfo],
    mode: PrintMode,
    w: &mut W,
) -> Result<(), ProfileError> {
    let mut out = format!("threads: {}\n", threads.len());

    match mode {
        PrintMode::Normal => {
            let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
            for thread in threads {
                *groups.entry(thread.name.as_str()).or_default() += 1;
            }
            let mut groups: Vec<(&str, usize)> = groups.into_iter().collect();
            // Largest groups first, ties by name
            groups.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
            for (name, count) in groups {
                out.push_str(&format!("{count:>7} {name}\n"));
            }
        }
        PrintMode::Detailed => {
            for thread in threads {
                out.push_str(&format!(
                    "{} {} {} ({})\n",
                    thread.tid,
                    thread.name,
                    thread.state,
                    describe_state(thread.state)
                ));
            }
        }
    }

    w.write_all(out.as_bytes()).map_err(ProfileError::sink)
}
