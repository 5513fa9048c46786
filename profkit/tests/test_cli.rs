use std::process::Command;

fn profkit(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_profkit")).args(args).output().expect("Failed to run profkit")
}

#[test]
fn test_gc_command_prints_one_line() {
    let output = profkit(&["gc"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1);
    // The binary records no pauses of its own
    assert!(stdout.starts_with("Alloc:"), "{stdout}");
}

#[test]
fn test_heap_command_detailed() {
    let output = profkit(&["--detailed", "heap"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("heap profile\n"));
    assert!(stdout.contains("# Alloc = "));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    let output = profkit(&[]);
    assert_eq!(output.status.code(), Some(2));
}

#[cfg(target_os = "linux")]
#[test]
fn test_report_command_writes_files() {
    let dir = tempfile::tempdir().unwrap();
    let output = profkit(&["-q", "report", "--output", dir.path().to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    for profile in ["threads", "thread-create", "heap", "allocs", "gc", "symbol"] {
        assert!(names.iter().any(|n| n.starts_with(&format!("{profile}-"))), "{profile} missing");
    }
}
