use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn create_test_files(root: &Path, files: &[(&str, &[u8])]) -> Result<()> {
    for (name, content) in files {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
    }
    Ok(())
}

fn bytescout() -> Result<Command> {
    let mut cmd = Command::cargo_bin("bytescout")?;
    cmd.env_remove("BYTESCOUT_DEBUG").env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn test_prints_only_aligned_matches() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        dir.path(),
        &[
            ("a.bin", &[0xAA, 0xBB, 0xCC, 0xDD]),
            ("sub/b.bin", &[0x11, 0xAA, 0xBB, 0xCC, 0xDD, 0x22]),
        ],
    )?;
    let root = dir.path().to_str().unwrap();

    bytescout()?
        .args([root, "0xAABBCCDD"])
        .assert()
        .success()
        .stdout(format!("{}/a.bin\n", root));
    Ok(())
}

#[test]
fn test_one_line_per_match() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        dir.path(),
        &[
            ("x/one.bin", b"\x00\x00\xCA\xFE"),
            ("y/two.bin", b"\xCA\xFE"),
            ("y/z/three.bin", b"\xCA\xFE\xCA\xFE"),
            ("miss.bin", b"\x00\xCA\xFE"),
        ],
    )?;

    let output = bytescout()?
        .arg(dir.path())
        .arg("0xcafe")
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let mut lines: Vec<&str> = stdout.lines().collect();
    lines.sort_unstable();
    let root = dir.path().display().to_string();
    let mut expected = vec![
        format!("{}/x/one.bin", root),
        format!("{}/y/two.bin", root),
        format!("{}/y/z/three.bin", root),
    ];
    expected.sort_unstable();
    assert_eq!(lines, expected);
    Ok(())
}

#[test]
fn test_trailing_slash_root_is_normalized() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(dir.path(), &[("hit.bin", b"\x01")])?;
    let root = format!("{}//", dir.path().display());

    bytescout()?
        .args([root.as_str(), "0x01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("//").not())
        .stdout(predicate::str::ends_with("/hit.bin\n"));
    Ok(())
}

#[test]
fn test_missing_directory_is_reported_but_not_fatal() -> Result<()> {
    let dir = tempdir()?;
    let missing = dir.path().join("missing");

    bytescout()?
        .arg(&missing)
        .arg("0x00")
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Error opening directory"));
    Ok(())
}

#[test]
fn test_invalid_patterns_are_rejected() -> Result<()> {
    let dir = tempdir()?;
    for pattern in ["AABB", "0x", "0xABC", "0xZZ"] {
        bytescout()?
            .arg(dir.path())
            .arg(pattern)
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("Invalid byte format"));
    }
    Ok(())
}

#[test]
fn test_missing_arguments_are_rejected() -> Result<()> {
    bytescout()?.assert().failure().code(2);
    bytescout()?.arg(".").assert().failure().code(2);
    Ok(())
}

#[test]
fn test_help_and_version() -> Result<()> {
    bytescout()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("<DIRECTORY>"))
        .stdout(predicate::str::contains("<PATTERN>"));

    bytescout()?
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn test_debug_env_var_traces_to_stderr() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(dir.path(), &[("sub/f.bin", b"\x07")])?;

    bytescout()?
        .env("BYTESCOUT_DEBUG", "1")
        .arg(dir.path())
        .arg("0x07")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("sub/f.bin\n"))
        .stderr(predicate::str::contains("Opened directory"))
        .stderr(predicate::str::contains("Pushed directory to worklist"))
        .stderr(predicate::str::contains("Closed directory"))
        .stderr(predicate::str::contains("Scanned file"));
    Ok(())
}

#[test]
fn test_no_trace_without_debug() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(dir.path(), &[("f.bin", b"\x07")])?;

    bytescout()?
        .env("BYTESCOUT_DEBUG", "")
        .arg(dir.path())
        .arg("0x07")
        .assert()
        .success()
        .stderr(predicate::str::contains("Opened directory").not());
    Ok(())
}

#[test]
fn test_stats_summary() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(dir.path(), &[("a.bin", b"\x01"), ("b.bin", b"\x02")])?;

    bytescout()?
        .args(["--stats"])
        .arg(dir.path())
        .arg("0x01")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Found 1 matching files out of 2 scanned in 1 directories",
        ));
    Ok(())
}

#[test]
fn test_invalid_log_level_is_rejected() -> Result<()> {
    let dir = tempdir()?;

    bytescout()?
        .args(["--log-level", "bogus"])
        .arg(dir.path())
        .arg("0x01")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--log-level"));

    bytescout()?
        .args(["--log-level", "info"])
        .arg(dir.path())
        .arg("0x01")
        .assert()
        .success();
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_non_utf8_file_name_is_printed_as_raw_bytes() -> Result<()> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir()?;
    let name = OsStr::from_bytes(b"bad\xFFname.bin");
    if fs::write(dir.path().join(name), b"\x01").is_err() {
        // Filesystem refuses non-UTF-8 names
        return Ok(());
    }

    let output = bytescout()?.arg(dir.path()).arg("0x01").output()?;
    assert!(output.status.success());

    let line = output
        .stdout
        .strip_suffix(b"\n")
        .expect("one line of output");
    let reported = Path::new(OsStr::from_bytes(line));
    assert!(reported.is_file(), "reported path does not exist: {:?}", reported);
    assert_eq!(reported.file_name(), Some(name));
    Ok(())
}

#[cfg(target_os = "linux")]
#[test]
fn test_failed_stdout_write_exits_with_failure() -> Result<()> {
    use assert_cmd::cargo::CommandCargoExt;
    use std::process::Command as StdCommand;

    let dir = tempdir()?;
    create_test_files(dir.path(), &[("hit.bin", b"\x01")])?;
    let Ok(full) = fs::OpenOptions::new().write(true).open("/dev/full") else {
        return Ok(());
    };

    let output = StdCommand::cargo_bin("bytescout")?
        .env_remove("BYTESCOUT_DEBUG")
        .env_remove("RUST_LOG")
        .arg(dir.path())
        .arg("0x01")
        .stdout(full)
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_closed_stdout_is_a_clean_exit() -> Result<()> {
    use assert_cmd::cargo::CommandCargoExt;
    use std::process::{Command as StdCommand, Stdio};

    let dir = tempdir()?;
    for i in 0..256 {
        fs::write(dir.path().join(format!("match-{:03}.bin", i)), b"\x01")?;
    }

    let mut child = StdCommand::cargo_bin("bytescout")?
        .env_remove("BYTESCOUT_DEBUG")
        .env_remove("RUST_LOG")
        .arg(dir.path())
        .arg("0x01")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    // Close the read end before (or while) matches are written
    drop(child.stdout.take());

    let output = child.wait_with_output()?;
    assert!(output.status.success(), "status: {:?}", output.status);
    assert!(!String::from_utf8_lossy(&output.stderr).contains("Error:"));
    Ok(())
}
