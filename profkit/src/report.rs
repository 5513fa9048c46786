//! Write every text profile to a folder
//!
//! Files are named `<profile>-<pid>.text` so reports from several processes
//! can share one folder.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::profiles::{ProfileKind, Profiler};
use crate::provider::DiagnosticsProvider;

/// Default output folder for report files
pub const DEFAULT_OUTPUT_FOLDER: &str = "./generated";

const SYMBOL_PROFILE: &str = "symbol";

fn create_file(folder: &Path, name: &str, extension: &str) -> Result<(PathBuf, BufWriter<File>)> {
    let path = folder.join(format!("{name}-{}.{extension}", std::process::id()));
    let file =
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok((path, BufWriter::new(file)))
}

/// Write all profiles into `folder`, creating it if needed
///
/// Returns the paths written, in order.
///
/// # Errors
/// Fails on the first profile that cannot be produced or written
pub fn write_report<P: DiagnosticsProvider>(profiler: &Profiler<P>, folder: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(folder)
        .with_context(|| format!("Failed to create output folder {}", folder.display()))?;

    let mut written = Vec::new();

    for kind in ProfileKind::ALL {
        info!(":: Executing: {kind}");
        let (path, mut writer) = create_file(folder, kind.name(), "text")?;
        profiler.write(kind, &mut writer).with_context(|| format!("{kind} profile failed"))?;
        writer.flush().with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    // Resolve this function's own address, so the symbol file is never empty
    // on a build with debug info
    info!(":: Executing: {SYMBOL_PROFILE}");
    let (path, mut writer) = create_file(folder, SYMBOL_PROFILE, "text")?;
    let probe = format!("{:#x}", write_report::<P> as usize);
    if let Err(e) = profiler.symbol(&[probe], &mut writer) {
        if e.is_sink_failure() {
            return Err(e).with_context(|| format!("Failed to write {}", path.display()));
        }
        // Stripped binaries still get the rest of the report
        warn!("symbol profile skipped: {e}");
    }
    writer.flush().with_context(|| format!("Failed to write {}", path.display()))?;
    written.push(path);

    info!("report written to {}", folder.display());
    Ok(written)
}
